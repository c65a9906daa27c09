use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

static LAST_PREFIX: AtomicI64 = AtomicI64::new(0);

/// Builds `<millis>-<sanitized name>`. The prefix is strictly increasing within the process,
/// so two uploads in the same millisecond still get distinct names.
pub fn storage_name(original: Option<&str>) -> String {
    let sanitized = match original.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => sanitize_file_name(name),
        None => "resume".to_string(),
    };
    format!("{}-{}", next_prefix(), sanitized)
}

/// Replaces every character other than ASCII letters, digits and `.` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Whether `name` could have come out of [`storage_name`]. Anything else is treated as absent.
pub fn is_servable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Best-effort content type from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain; charset=utf-8",
        "rtf" => "application/rtf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn next_prefix() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_PREFIX.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_PREFIX.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_each_disallowed_char() {
        assert_eq!(sanitize_file_name("résumé (final).pdf"), "r_sum___final_.pdf");
        assert_eq!(sanitize_file_name("cv.v2.PDF"), "cv.v2.PDF");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
    }

    #[test]
    fn test_storage_name_shape() {
        let name = storage_name(Some("résumé (final).pdf"));
        let (prefix, rest) = name.split_once('-').unwrap();
        assert!(prefix.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(rest, "r_sum___final_.pdf");
        assert!(is_servable_name(&name));
    }

    #[test]
    fn test_storage_name_without_original() {
        assert!(storage_name(None).ends_with("-resume"));
        assert!(storage_name(Some("  ")).ends_with("-resume"));
    }

    #[test]
    fn test_prefixes_strictly_increase() {
        let prefixes: Vec<i64> = (0..100)
            .map(|_| {
                storage_name(Some("a.pdf"))
                    .split_once('-')
                    .unwrap()
                    .0
                    .parse()
                    .unwrap()
            })
            .collect();
        assert!(prefixes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_unservable_names() {
        assert!(!is_servable_name(""));
        assert!(!is_servable_name(".."));
        assert!(!is_servable_name(".env"));
        assert!(!is_servable_name("a/b.pdf"));
        assert!(!is_servable_name("a\\b.pdf"));
        assert!(is_servable_name("1700000000000-cv.pdf"));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("x.PDF"), "application/pdf");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}

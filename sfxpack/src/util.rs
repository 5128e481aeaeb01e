use humansize::{format_size as humansize_format, BINARY};

/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    humansize_format(bytes, BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KiB");
    }
}

//! Pure pre-upload size check.

/// Archives of this many bytes or more are never uploaded (2 GiB).
pub const MAX_ARCHIVE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDecision {
    Accepted,
    Rejected,
}

/// Strictly below `limit` is accepted.
pub fn check_size(byte_len: u64, limit: u64) -> SizeDecision {
    if byte_len < limit {
        SizeDecision::Accepted
    } else {
        SizeDecision::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_byte_under_the_limit_is_accepted() {
        assert_eq!(
            check_size(MAX_ARCHIVE_BYTES - 1, MAX_ARCHIVE_BYTES),
            SizeDecision::Accepted
        );
        assert_eq!(MAX_ARCHIVE_BYTES - 1, 2_147_483_647);
    }

    #[test]
    fn exactly_the_limit_is_rejected() {
        assert_eq!(MAX_ARCHIVE_BYTES, 2_147_483_648);
        assert_eq!(
            check_size(MAX_ARCHIVE_BYTES, MAX_ARCHIVE_BYTES),
            SizeDecision::Rejected
        );
        assert_eq!(
            check_size(u64::MAX, MAX_ARCHIVE_BYTES),
            SizeDecision::Rejected
        );
    }

    #[test]
    fn empty_archive_is_accepted() {
        assert_eq!(check_size(0, MAX_ARCHIVE_BYTES), SizeDecision::Accepted);
    }
}

//! Process exit codes for `quest`.

pub use quest_core::error::exit_codes::{ALL_STRATEGIES_EXHAUSTED, CLIENT_ERROR, INVALID_QUERY};

pub const SUCCESS: i32 = 0;
pub const NO_MATCH: i32 = 1; // `quest mock` found no catalog entry
pub const INTERNAL_ERROR: i32 = 2; // Bad arguments or unexpected failure

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_do_not_collide() {
        let mut codes = vec![
            SUCCESS,
            NO_MATCH,
            INTERNAL_ERROR,
            INVALID_QUERY,
            CLIENT_ERROR,
            ALL_STRATEGIES_EXHAUSTED,
        ];
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 6);
    }
}

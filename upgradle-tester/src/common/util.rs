use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse decimal or `0x`-prefixed hexadecimal seeds. Underscores are ignored.
pub fn parse_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    tokens
        .iter()
        .map(|token| {
            let digits = token.replace('_', "");
            let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => digits.parse::<u64>(),
            };
            parsed.with_context(|| format!("invalid seed `{token}`"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empty() {
        assert_eq!(split_csv(" smoke, ,solver,"), vec!["smoke", "solver"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn seeds_accept_decimal_and_hex() {
        let seeds = parse_seeds(&split_csv("1337, 0xFF, 1_000")).unwrap();
        assert_eq!(seeds, vec![1337, 255, 1000]);
    }

    #[test]
    fn bad_seed_reports_token() {
        let err = parse_seeds(&["nope".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("nope"));
    }
}

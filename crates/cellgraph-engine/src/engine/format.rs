/// Format a number for display and for canonical formula text.
///
/// Uses the shortest representation that parses back to the same value.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Collapse negative zero.
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(11.0), "11");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(1e21).parse::<f64>().unwrap(), 1e21);
    }
}

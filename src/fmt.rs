/// Insert thousands separators into a string of digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));
    let sign = if val < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${}.{dec_part}", group_thousands(int_part))
}

/// Whole-dollar amount for table columns: $412,300
pub fn dollars(val: f64) -> String {
    let whole = format!("{:.0}", val.abs());
    let sign = if val < 0.0 && whole != "0" { "-" } else { "" };
    format!("{sign}${}", group_thousands(&whole))
}

pub fn percent(val: f64) -> String {
    format!("{val:.1}%")
}

/// Compact axis label: $950, $12.5k, $1.2M
pub fn format_k(val: f64) -> String {
    let abs = val.abs();
    let sign = if val < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        let m = abs / 1_000_000.0;
        if m == m.floor() {
            format!("{sign}${}M", m as u64)
        } else {
            format!("{sign}${m:.1}M")
        }
    } else if abs >= 1000.0 {
        let k = abs / 1000.0;
        if k == k.floor() {
            format!("{sign}${}k", k as u64)
        } else {
            format!("{sign}${k:.1}k")
        }
    } else {
        format!("{sign}${}", abs.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(-0.001), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(5000.0), "$5,000.00");
        assert_eq!(money(708.333), "$708.33");
    }

    #[test]
    fn test_dollars_and_percent() {
        assert_eq!(dollars(412300.4), "$412,300");
        assert_eq!(dollars(999.6), "$1,000");
        assert_eq!(percent(99.0245), "99.0%");
        assert_eq!(percent(0.28), "0.3%");
    }

    #[test]
    fn test_format_k() {
        assert_eq!(format_k(950.0), "$950");
        assert_eq!(format_k(12_500.0), "$12.5k");
        assert_eq!(format_k(40_000.0), "$40k");
        assert_eq!(format_k(1_200_000.0), "$1.2M");
    }
}

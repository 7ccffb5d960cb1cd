/// Whole rupees with thousands separators: `350000.0` -> `₹350,000`.
pub fn format_rupees(value: f64) -> String {
    format!("₹{}", group_thousands(value.round()))
}

pub fn format_lakhs(value: f64) -> String {
    format!("{:.2} L", value)
}

fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{:.0}", value.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if negative && out != "0" {
        out.insert(0, '-');
    }
    out
}

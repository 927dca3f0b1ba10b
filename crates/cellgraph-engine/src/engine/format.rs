/// Format a number for display and for canonical formula text.
///
/// Uses the shortest representation that round-trips through `f64` parsing.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else if n == 0.0 {
        // Avoid rendering negative zero as "-0".
        "0".to_string()
    } else {
        n.to_string()
    }
}

//! Temperature unit conversion.

/// Degrees Celsius to degrees Fahrenheit: `F = C * 9/5 + 32`.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Degrees Fahrenheit to degrees Celsius.
pub fn to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert a series, leaving missing values missing.
pub fn series_to_fahrenheit(series: &[Option<f64>]) -> Vec<Option<f64>> {
    series.iter().map(|v| v.map(to_fahrenheit)).collect()
}

/// Converts a WMO weather code to a human-readable description.
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn weather_code_to_description(code: i32) -> Option<&'static str> {
    let description = match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };
    Some(description)
}

/// Like [`weather_code_to_description`], but unmapped codes describe as `""`.
pub fn describe_weather_code(code: i32) -> &'static str {
    weather_code_to_description(code).unwrap_or_default()
}

/// Formats a coordinate for an outbound query string
pub fn format_coordinate(value: f64) -> String {
    format!("{:.6}", value)
}

/// Escapes text for safe inclusion in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table_known_codes() {
        assert_eq!(weather_code_to_description(0), Some("Clear"));
        assert_eq!(weather_code_to_description(61), Some("Slight rain"));
        assert_eq!(weather_code_to_description(95), Some("Thunderstorm"));
        assert_eq!(weather_code_to_description(99), Some("Thunderstorm with heavy hail"));
    }

    #[test]
    fn test_code_table_covers_every_category() {
        let codes = [
            0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82,
            85, 86, 95, 96, 99,
        ];
        for code in codes {
            assert!(weather_code_to_description(code).is_some(), "code {code} unmapped");
        }
    }

    #[test]
    fn test_unmapped_code_is_empty_not_error() {
        assert_eq!(weather_code_to_description(12), None);
        assert_eq!(describe_weather_code(12), "");
        assert_eq!(describe_weather_code(-1), "");
        assert_eq!(describe_weather_code(61), "Slight rain");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(0.0), "0.000000");
        assert_eq!(format_coordinate(45.6085), "45.608500");
        assert_eq!(format_coordinate(-73.5493), "-73.549300");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"AT&T" isn't</b>"#),
            "&lt;b&gt;&quot;AT&amp;T&quot; isn&#39;t&lt;/b&gt;"
        );
        assert_eq!(escape_html("Montréal"), "Montréal");
    }
}

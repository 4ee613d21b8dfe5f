//! String and type-expression utilities for code generation

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            // Add underscore before uppercase letter if:
            // - Not at the start
            // - Previous character was lowercase
            if i > 0 && prev_is_lowercase {
                result.push('_');
            }
            result.push(ch.to_lowercase().next().unwrap());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase();
        } else if ch == '-' || ch == '_' || ch == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    // Remove duplicate underscores and trim
    let mut final_result = String::new();
    let mut prev_underscore = false;
    for ch in result.chars() {
        if ch == '_' {
            if !prev_underscore && !final_result.is_empty() {
                final_result.push(ch);
            }
            prev_underscore = true;
        } else {
            final_result.push(ch);
            prev_underscore = false;
        }
    }

    final_result.trim_matches('_').to_string()
}

/// Convert a string to UpperCamelCase (PascalCase)
pub fn to_upper_camel_case(s: &str) -> String {
    let snake = to_snake_case(s);

    snake
        .split('_')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Convert a string to lowerCamelCase
///
/// Parameter keys default to the lowerCamelCase form of the field name when
/// the annotation does not override them.
pub fn to_lower_camel_case(s: &str) -> String {
    let upper_camel = to_upper_camel_case(s);
    if upper_camel.is_empty() {
        return upper_camel;
    }

    let mut chars = upper_camel.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Peel one layer of `Option<...>` from a type expression, if present.
pub fn strip_option(ty: &str) -> Option<&str> {
    strip_wrapper(ty, "Option")
}

/// Peel one layer of `Vec<...>` from a type expression, if present.
pub fn strip_vec(ty: &str) -> Option<&str> {
    strip_wrapper(ty, "Vec")
}

fn strip_wrapper<'a>(ty: &'a str, wrapper: &str) -> Option<&'a str> {
    let ty = ty.trim();
    let inner = ty
        .strip_prefix(wrapper)
        .and_then(|rest| rest.trim_start().strip_prefix('<'))?;
    let inner = inner.strip_suffix('>')?;
    Some(inner.trim())
}

/// Last `::`-separated segment of a path expression, generics stripped.
///
/// `some::pkg::OrderType` and `OrderType<T>` both yield `OrderType`.
pub fn last_path_segment(path: &str) -> &str {
    let base = path.split('<').next().unwrap_or(path).trim();
    base.rsplit("::").next().unwrap_or(base).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("PlaceOrderRequest"), "place_order_request");
        assert_eq!(to_snake_case("placeOrderRequest"), "place_order_request");
        assert_eq!(to_snake_case("place-order-request"), "place_order_request");
        assert_eq!(to_snake_case("place_order_request"), "place_order_request");
    }

    #[test]
    fn test_to_upper_camel_case() {
        assert_eq!(to_upper_camel_case("place_order"), "PlaceOrder");
        assert_eq!(to_upper_camel_case("placeOrder"), "PlaceOrder");
        assert_eq!(to_upper_camel_case("client"), "Client");
    }

    #[test]
    fn test_to_lower_camel_case() {
        assert_eq!(to_lower_camel_case("start_time"), "startTime");
        assert_eq!(to_lower_camel_case("client_order_id"), "clientOrderId");
        assert_eq!(to_lower_camel_case("StartTime"), "startTime");
        assert_eq!(to_lower_camel_case("page"), "page");
    }

    #[test]
    fn test_strip_option() {
        assert_eq!(strip_option("Option<String>"), Some("String"));
        assert_eq!(strip_option("Option<Vec<i64>>"), Some("Vec<i64>"));
        assert_eq!(strip_option("Option< String >"), Some("String"));
        assert_eq!(strip_option("String"), None);
    }

    #[test]
    fn test_strip_vec() {
        assert_eq!(strip_vec("Vec<i64>"), Some("i64"));
        assert_eq!(strip_vec("Vec<String>"), Some("String"));
        assert_eq!(strip_vec("String"), None);
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("exchange::SideType"), "SideType");
        assert_eq!(last_path_segment("SideType"), "SideType");
        assert_eq!(last_path_segment("Arc<dyn ApiClient>"), "Arc");
        assert_eq!(
            last_path_segment("chrono::DateTime<chrono::Utc>"),
            "DateTime"
        );
    }
}

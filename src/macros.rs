/// Builds a [`TagValue`](crate::TagValue) from a literal.
///
/// `[...]` becomes a list, `{ "key": value, ... }` a map (keys keep their
/// order), and anything else is converted with `TagValue::from`, so string
/// literals, `String`s and existing values all work.
///
/// # Examples
///
/// ```rust
/// use tagstring::{tag, TagValue};
///
/// let value = tag!({
///     "people": ["ann", "bob"],
///     "place": { "city": "Oslo" }
/// });
/// assert_eq!(value.to_string(), "{people=[ann,bob],place={city=Oslo}}");
///
/// let year = 2024.to_string();
/// assert_eq!(tag!(year), TagValue::from("2024"));
/// ```
#[macro_export]
macro_rules! tag {
    ([]) => {
        $crate::TagValue::List(::std::vec::Vec::new())
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::TagValue::List(::std::vec![$($crate::tag!($elem)),+])
    };

    ({}) => {
        $crate::TagValue::Map($crate::TagMap::new())
    };

    ({ $($key:literal : $value:tt),+ $(,)? }) => {{
        let mut map = $crate::TagMap::new();
        $(
            map.insert(::std::string::String::from($key), $crate::tag!($value));
        )+
        $crate::TagValue::Map(map)
    }};

    ($other:expr) => {
        $crate::TagValue::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{TagMap, TagValue};

    #[test]
    fn test_tag_macro_strings() {
        assert_eq!(tag!("hello"), TagValue::Str("hello".to_string()));
        assert_eq!(tag!(String::from("x")), TagValue::from("x"));
    }

    #[test]
    fn test_tag_macro_lists() {
        assert_eq!(tag!([]), TagValue::List(vec![]));
        assert_eq!(tag!(["a", ["b"]]), TagValue::List(vec![
            TagValue::from("a"),
            TagValue::List(vec![TagValue::from("b")]),
        ]));
    }

    #[test]
    fn test_tag_macro_maps_keep_order() {
        assert_eq!(tag!({}), TagValue::Map(TagMap::new()));

        let value = tag!({ "z": "1", "a": ["2"] });
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}

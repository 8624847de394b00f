/// Builds a [`Variant`](crate::Variant) from a JSON-like literal.
///
/// Any other expression is converted with `Variant::from`, so scalars keep
/// the kind of their Rust type (`42` is an `Int`, `42u64` a `ULong`). Wrap
/// negative numbers in parentheses.
///
/// ```rust
/// use variant_codec::{variant, Kind};
///
/// let v = variant!({ "id": 7, "tags": ["a", "b"], "ratio": (-0.5), "next": null });
/// assert_eq!(v.kind(), Kind::Map);
/// assert_eq!(v.get("tags").unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! variant {
    (null) => {
        $crate::Variant::Null
    };

    (true) => {
        $crate::Variant::Bool(true)
    };

    (false) => {
        $crate::Variant::Bool(false)
    };

    ([]) => {
        $crate::Variant::List($crate::VariantList::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Variant::List($crate::VariantList::from(vec![$($crate::variant!($elem)),*]))
    };

    ({}) => {
        $crate::Variant::Map($crate::VariantMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Variant::Map(
            [$(($key.to_string(), $crate::variant!($value))),*]
                .into_iter()
                .collect::<$crate::VariantMap>(),
        )
    };

    ($s:expr) => {
        $crate::Variant::from($s)
    };
}

/// Stable name of a resource, reported alongside validation errors.
pub trait ResourceID {
    fn resource_id() -> &'static str;
}

macro_rules! resource_id {
    ($type:ty, $resource_name:literal) => {
        impl crate::base::ResourceID for $type {
            fn resource_id() -> &'static str {
                $resource_name
            }
        }
    };
}

pub(crate) use resource_id;

resource_id!(u64, "base::u64");
resource_id!(i64, "base::i64");
resource_id!(String, "base::string");

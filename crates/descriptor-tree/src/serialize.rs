//! Conversions between Rust values and descriptor nodes.
//!
//! Reading is as lenient as the scalar accessors: a missing or mistyped node
//! yields the type's default rather than an error.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::descriptor::Descriptor;
use crate::node::ObjectType;

/// Writes `self` into an existing node.
pub trait ToDescriptor {
    fn to_descriptor(&self, target: &Descriptor);
}

/// Reads a value back out of a node.
pub trait FromDescriptor: Sized {
    fn from_descriptor(source: &Descriptor) -> Self;
}

impl Descriptor {
    /// Creates a new tree holding `value`.
    pub fn serialize<T: ToDescriptor + ?Sized>(value: &T) -> Descriptor {
        let descriptor = Descriptor::new();
        value.to_descriptor(&descriptor);
        descriptor
    }

    pub fn deserialize<T: FromDescriptor>(&self) -> T {
        T::from_descriptor(self)
    }
}

impl ToDescriptor for bool {
    fn to_descriptor(&self, target: &Descriptor) {
        target.set_bool(*self);
    }
}

impl FromDescriptor for bool {
    fn from_descriptor(source: &Descriptor) -> Self {
        source.as_bool(false)
    }
}

macro_rules! int_conversions {
    ($($t:ty),*) => {$(
        impl ToDescriptor for $t {
            fn to_descriptor(&self, target: &Descriptor) {
                target.set_text(&self.to_string(), crate::node::ValueType::Int);
            }
        }

        impl FromDescriptor for $t {
            fn from_descriptor(source: &Descriptor) -> Self {
                match source.value_text() {
                    Some(text) => text
                        .parse::<$t>()
                        .unwrap_or_else(|_| <$t>::try_from(source.as_int(0)).unwrap_or_default()),
                    None => <$t>::default(),
                }
            }
        }
    )*};
}

int_conversions!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToDescriptor for f64 {
    fn to_descriptor(&self, target: &Descriptor) {
        target.set_float(*self);
    }
}

impl FromDescriptor for f64 {
    fn from_descriptor(source: &Descriptor) -> Self {
        source.as_float(0.0)
    }
}

impl ToDescriptor for f32 {
    fn to_descriptor(&self, target: &Descriptor) {
        target.set_float(f64::from(*self));
    }
}

impl FromDescriptor for f32 {
    fn from_descriptor(source: &Descriptor) -> Self {
        source.as_float(0.0) as f32
    }
}

impl ToDescriptor for str {
    fn to_descriptor(&self, target: &Descriptor) {
        target.set_str(self);
    }
}

impl ToDescriptor for String {
    fn to_descriptor(&self, target: &Descriptor) {
        target.set_str(self);
    }
}

impl FromDescriptor for String {
    fn from_descriptor(source: &Descriptor) -> Self {
        source.as_string("")
    }
}

impl<T: ToDescriptor + ?Sized> ToDescriptor for &T {
    fn to_descriptor(&self, target: &Descriptor) {
        (**self).to_descriptor(target);
    }
}

impl<T: ToDescriptor> ToDescriptor for Option<T> {
    fn to_descriptor(&self, target: &Descriptor) {
        match self {
            Some(value) => value.to_descriptor(target),
            None => target.clear(),
        }
    }
}

impl<T: FromDescriptor> FromDescriptor for Option<T> {
    fn from_descriptor(source: &Descriptor) -> Self {
        if source.is_null() {
            None
        } else {
            Some(T::from_descriptor(source))
        }
    }
}

impl<T: ToDescriptor> ToDescriptor for [T] {
    fn to_descriptor(&self, target: &Descriptor) {
        target.clear();
        target.set_type(ObjectType::Array);
        for item in self {
            item.to_descriptor(&target.add(""));
        }
    }
}

impl<T: ToDescriptor> ToDescriptor for Vec<T> {
    fn to_descriptor(&self, target: &Descriptor) {
        self.as_slice().to_descriptor(target);
    }
}

impl<T: FromDescriptor> FromDescriptor for Vec<T> {
    fn from_descriptor(source: &Descriptor) -> Self {
        source.members().iter().map(T::from_descriptor).collect()
    }
}

fn write_entries<'a, T: ToDescriptor + 'a>(
    target: &Descriptor,
    entries: impl Iterator<Item = (&'a String, &'a T)>,
) {
    target.clear();
    target.set_type(ObjectType::Object);
    for (name, value) in entries {
        value.to_descriptor(&target.add(name));
    }
}

/// Named members in order; the first member wins for repeated names.
fn read_entries<T: FromDescriptor>(source: &Descriptor) -> Vec<(String, T)> {
    let mut seen = std::collections::HashSet::new();
    source
        .members()
        .iter()
        .filter_map(|member| {
            let name = member.name();
            seen.insert(name.clone())
                .then(|| (name, T::from_descriptor(member)))
        })
        .collect()
}

impl<T: ToDescriptor> ToDescriptor for BTreeMap<String, T> {
    fn to_descriptor(&self, target: &Descriptor) {
        write_entries(target, self.iter());
    }
}

impl<T: FromDescriptor> FromDescriptor for BTreeMap<String, T> {
    fn from_descriptor(source: &Descriptor) -> Self {
        read_entries(source).into_iter().collect()
    }
}

impl<T: ToDescriptor, S: BuildHasher> ToDescriptor for HashMap<String, T, S> {
    fn to_descriptor(&self, target: &Descriptor) {
        write_entries(target, self.iter());
    }
}

impl<T: FromDescriptor, S: BuildHasher + Default> FromDescriptor for HashMap<String, T, S> {
    fn from_descriptor(source: &Descriptor) -> Self {
        read_entries(source).into_iter().collect()
    }
}

impl ToDescriptor for Descriptor {
    fn to_descriptor(&self, target: &Descriptor) {
        target.assign(self);
    }
}

impl FromDescriptor for Descriptor {
    /// Deep copy into a new tree.
    fn from_descriptor(source: &Descriptor) -> Self {
        let copy = Descriptor::new();
        copy.assign(source);
        copy
    }
}

use super::{impl_entity, state_ref, EntityData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub(in crate::domain) name: String,
    pub(in crate::domain) age: i32,
    pub(in crate::domain) gender: String,
}

/// A registered user.
///
/// Identity and creation instant are assigned once by [`User::new`] and never
/// change afterwards; only the state fields are mutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub(in crate::domain) data: EntityData,
    pub(in crate::domain) state: UserState,
}

impl_entity!(User);

impl User {
    state_ref!(name, String);
    state_ref!(gender, String);

    pub fn age(&self) -> i32 {
        self.state.age
    }

    pub fn new(name: String, age: i32, gender: String) -> Self {
        Self::restore(EntityData::new(), UserState { name, age, gender })
    }

    pub fn restore(data: EntityData, state: UserState) -> Self {
        Self { data, state }
    }

    /// Replaces the name, returning whether the stored value changed.
    pub fn set_name(&mut self, name: String) -> bool {
        replace_changed(&mut self.state.name, name)
    }

    pub fn set_age(&mut self, age: i32) -> bool {
        replace_changed(&mut self.state.age, age)
    }

    pub fn set_gender(&mut self, gender: String) -> bool {
        replace_changed(&mut self.state.gender, gender)
    }
}

fn replace_changed<T: PartialEq>(field: &mut T, value: T) -> bool {
    if *field == value {
        return false;
    }
    *field = value;
    true
}

//! Domain models that mirror the SQLite schema and get passed between the
//! roster, the session controller and the console view. They stay plain data
//! holders: the fields are private and only readable through accessors, so no
//! layer can mutate a person behind the roster's back.

use std::fmt;

/// Shared capability of doctors and patients. Dedup across the roster keys
/// on [`Person::name`] alone.
pub trait Person {
    fn name(&self) -> &str;
    fn age(&self) -> u32;
    fn role(&self) -> Role;
}

/// Which table a person lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => f.write_str("Doctor"),
            Role::Patient => f.write_str("Patient"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A doctor on the clinic's staff.
pub struct Doctor {
    name: String,
    age: u32,
    specialty: String,
}

impl Doctor {
    pub fn new(name: impl Into<String>, age: u32, specialty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            specialty: specialty.into(),
        }
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }
}

impl Person for Doctor {
    fn name(&self) -> &str {
        &self.name
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn role(&self) -> Role {
        Role::Doctor
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.specialty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A patient registered with the clinic. `condition` is free text.
pub struct Patient {
    name: String,
    age: u32,
    condition: String,
}

impl Patient {
    pub fn new(name: impl Into<String>, age: u32, condition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            condition: condition.into(),
        }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }
}

impl Person for Patient {
    fn name(&self) -> &str {
        &self.name
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn role(&self) -> Role {
        Role::Patient
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_expose_constructor_values() {
        let doctor = Doctor::new("dr. Panji", 45, "Penyakit Dalam");
        assert_eq!(doctor.name(), "dr. Panji");
        assert_eq!(doctor.age(), 45);
        assert_eq!(doctor.specialty(), "Penyakit Dalam");
        assert_eq!(doctor.role(), Role::Doctor);

        let patient = Patient::new("Andi", 30, "Demam");
        assert_eq!(patient.condition(), "Demam");
        assert_eq!(patient.role(), Role::Patient);
    }

    #[test]
    fn display_includes_the_distinguishing_field() {
        assert_eq!(
            Doctor::new("dr. Rifqi", 45, "Penyakit Hati").to_string(),
            "dr. Rifqi (Penyakit Hati)"
        );
        assert_eq!(Patient::new("Jaka", 25, "Stroke").to_string(), "Jaka (Stroke)");
    }
}

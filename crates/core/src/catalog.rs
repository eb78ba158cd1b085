use thiserror::Error;

use crate::model::{Exercise, ExerciseId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog cannot be empty")]
    Empty,

    #[error("catalog ids must be strictly increasing (saw {prev} before {next})")]
    OutOfOrder { prev: ExerciseId, next: ExerciseId },
}

/// Immutable ordered list of exercise definitions.
///
/// Loaded once at process start and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    /// Create a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty list, and
    /// `CatalogError::OutOfOrder` when ids are not strictly increasing
    /// (which also guarantees uniqueness).
    pub fn new(exercises: Vec<Exercise>) -> Result<Self, CatalogError> {
        if exercises.is_empty() {
            return Err(CatalogError::Empty);
        }
        for pair in exercises.windows(2) {
            if pair[1].id() <= pair[0].id() {
                return Err(CatalogError::OutOfOrder {
                    prev: pair[0].id(),
                    next: pair[1].id(),
                });
            }
        }
        Ok(Self { exercises })
    }

    /// The built-in 20-entry beginner catalog.
    ///
    /// # Panics
    ///
    /// Panics if the static catalog data is invalid, which would be a bug in
    /// this crate.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |id: u64, title: &str, description: &str, expected: Option<&str>, hint: &str| {
            Exercise::new(
                ExerciseId::new(id),
                title,
                description,
                expected.map(str::to_owned),
                hint,
            )
            .expect("built-in exercise data should be valid")
        };

        let exercises = vec![
            entry(
                1,
                "Hello World",
                "Print the text: Hello, World!",
                Some("Hello, World!"),
                "Use print() with the text in quotes",
            ),
            entry(
                2,
                "Your Name",
                "Print your name",
                None,
                "Type your name inside quotes",
            ),
            entry(
                3,
                "Multiple Words",
                "Print: Python is fun",
                Some("Python is fun"),
                "Put the entire sentence in quotes",
            ),
            entry(
                4,
                "Numbers",
                "Print the number 42",
                Some("42"),
                "Numbers can be printed with or without quotes",
            ),
            entry(
                5,
                "Two Lines",
                "Print 'Hello' on one line and 'Python' on the next line",
                Some("Hello\nPython"),
                "Use two separate print statements",
            ),
            entry(
                6,
                "Addition Result",
                "Print the result of 15 + 27",
                Some("42"),
                "You can do math inside print()",
            ),
            entry(
                7,
                "Multiplication",
                "Print the result of 6 * 7",
                Some("42"),
                "Use the * operator for multiplication",
            ),
            entry(
                8,
                "Text and Number",
                "Print: The answer is 100",
                Some("The answer is 100"),
                "Put the entire phrase in quotes",
            ),
            entry(
                9,
                "Three Lines",
                "Print the numbers 1, 2, and 3, each on a separate line",
                Some("1\n2\n3"),
                "Use three print statements",
            ),
            entry(
                10,
                "Empty Line",
                "Print 'Start', then a blank line, then 'End'",
                Some("Start\n\nEnd"),
                "Use print() with nothing inside for a blank line",
            ),
            entry(
                11,
                "Quotes in Text",
                "Print: She said \"Hello\"",
                Some("She said \"Hello\""),
                "Use single quotes around the text or escape double quotes with \\",
            ),
            entry(
                12,
                "Comma Separator",
                "Print 'apple', 'banana', 'cherry' separated by spaces using commas in print",
                Some("apple banana cherry"),
                "Use print('apple', 'banana', 'cherry')",
            ),
            entry(
                13,
                "Concatenation",
                "Print 'Hello' + 'World' as one word",
                Some("HelloWorld"),
                "Use the + operator between strings",
            ),
            entry(
                14,
                "Subtraction",
                "Print the result of 100 - 58",
                Some("42"),
                "Use the - operator",
            ),
            entry(
                15,
                "Division",
                "Print the result of 84 / 2",
                Some("42.0"),
                "Use the / operator for division",
            ),
            entry(
                16,
                "Repeat String",
                "Print 'Ha' three times as 'HaHaHa'",
                Some("HaHaHa"),
                "Use 'Ha' * 3",
            ),
            entry(
                17,
                "Mixed Operations",
                "Print the result of (5 + 3) * 2",
                Some("16"),
                "Use parentheses for order of operations",
            ),
            entry(
                18,
                "Multiple Items",
                "Print three separate items on the same line: Python, 2025, and True",
                Some("Python 2025 True"),
                "Separate items with commas in print()",
            ),
            entry(
                19,
                "Apostrophe",
                "Print: It's a beautiful day",
                Some("It's a beautiful day"),
                "Use double quotes around text containing an apostrophe",
            ),
            entry(
                20,
                "Simple Math Expression",
                "Print: 2 + 2 = and then the result",
                Some("2 + 2 = 4"),
                "Combine text and calculation: print('2 + 2 =', 2 + 2)",
            ),
        ];

        Self::new(exercises).expect("built-in catalog should be valid")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: u64) -> Exercise {
        Exercise::new(ExerciseId::new(id), "T", "D", None, "H").unwrap()
    }

    #[test]
    fn builtin_catalog_has_twenty_ordered_entries() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 20);
        assert_eq!(catalog.get(0).unwrap().id(), ExerciseId::new(1));
        assert_eq!(catalog.get(19).unwrap().id(), ExerciseId::new(20));
    }

    #[test]
    fn builtin_catalog_has_one_open_ended_entry() {
        let open: Vec<_> = Catalog::builtin()
            .iter()
            .filter(|ex| ex.is_open_ended())
            .map(|ex| ex.id())
            .collect();
        assert_eq!(open, vec![ExerciseId::new(2)]);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::new(Vec::new()).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Catalog::new(vec![exercise(1), exercise(1)]).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfOrder { .. }));
    }

    #[test]
    fn descending_ids_are_rejected() {
        let err = Catalog::new(vec![exercise(2), exercise(1)]).unwrap_err();
        assert!(matches!(err, CatalogError::OutOfOrder { .. }));
    }
}

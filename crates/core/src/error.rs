use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::ExerciseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
}

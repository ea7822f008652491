//! Add-movie form handling.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::client::{CatalogClient, ClientError};
use crate::models::movie::{ImdbInput, InsertedMovie, NewMovieRequest};
use crate::utils::coerce::{is_numeric, parse_float_prefix, parse_int_prefix};

/// Field name to message, for every field that failed.
pub type FormErrors = BTreeMap<&'static str, &'static str>;

const REQUIRED: &str = "This field is required";

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Please fill in all required fields")]
    Invalid(FormErrors),

    #[error(transparent)]
    Api(#[from] ClientError),
}

/// Raw text of the add-movie form, exactly as typed.
/// List fields are comma-separated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieForm {
    pub title: String,
    pub plot: String,
    pub year: String,
    pub directors: String,
    pub cast: String,
    pub genres: String,
    pub runtime: String,
    pub poster: String,
    pub imdb_rating: String,
}

impl MovieForm {
    /// Checks the form and builds the request body.
    ///
    /// Everything except poster and rating is required; year and runtime
    /// must be numbers. A missing or unreadable rating becomes 0.
    pub fn validate(&self) -> Result<NewMovieRequest, FormErrors> {
        let directors = split_list(&self.directors);
        let cast = split_list(&self.cast);
        let genres = split_list(&self.genres);

        let mut errors = FormErrors::new();
        let text_fields = [
            ("title", &self.title),
            ("plot", &self.plot),
            ("year", &self.year),
            ("runtime", &self.runtime),
        ];
        for (name, value) in text_fields {
            if value.trim().is_empty() {
                errors.insert(name, REQUIRED);
            }
        }
        for (name, list) in [("directors", &directors), ("cast", &cast), ("genres", &genres)] {
            if list.is_empty() {
                errors.insert(name, REQUIRED);
            }
        }

        if !self.year.trim().is_empty() && !is_numeric(&self.year) {
            errors.insert("year", "Please enter a valid year");
        }
        if !self.runtime.trim().is_empty() && !is_numeric(&self.runtime) {
            errors.insert("runtime", "Please enter a valid runtime");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let poster = self.poster.trim();
        Ok(NewMovieRequest {
            title: Some(self.title.trim().to_string()),
            plot: Some(self.plot.trim().to_string()),
            year: parse_int_prefix(&self.year).and_then(|v| i32::try_from(v).ok()),
            runtime: parse_int_prefix(&self.runtime).and_then(|v| i32::try_from(v).ok()),
            directors: directors.into(),
            cast: cast.into(),
            genres: genres.into(),
            poster: (!poster.is_empty()).then(|| poster.to_string()),
            imdb: Some(ImdbInput {
                rating: Some(parse_float_prefix(&self.imdb_rating).unwrap_or(0.0)),
            }),
            extra: Default::default(),
        })
    }

    /// Validates, then sends the movie. Nothing is sent when validation fails.
    pub async fn submit(&self, client: &CatalogClient) -> Result<InsertedMovie, SubmitError> {
        let movie = self.validate().map_err(SubmitError::Invalid)?;
        Ok(client.add_movie(&movie).await?)
    }
}

/// Splits comma-separated input, trimming items and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

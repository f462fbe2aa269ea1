//! Data model for accounts, films, crew, and interactions

pub mod account;
pub mod film;

pub use account::{Account, NewAccount};
pub use film::{CrewMember, Film, FilmIdRequest, NewCrewMember, NewFilm};

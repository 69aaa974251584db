//! Descriptive house details
//!
//! Names, directors, addresses and the nationality label used by the
//! assignment policy, plus the patch and draft shapes used to edit them.

use serde::{Deserialize, Serialize};

/// Image shown for a house that was created without one
pub const DEFAULT_IMAGE: &str = "images/default_image.png";

/// Descriptive details of a house
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseProfile {
    /// Display name
    pub name: String,
    /// Nationality label matched against student nationalities
    pub nationality: Option<String>,
    /// Director name
    pub director: String,
    /// Postal address
    pub location: String,
    /// Free-text description
    pub description: String,
    /// Image reference
    pub image: String,
}

impl HouseProfile {
    /// Create a profile with an empty description and the default image
    pub fn new(
        name: impl Into<String>,
        nationality: Option<String>,
        director: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            nationality: normalize_nationality(nationality),
            director: director.into(),
            location: location.into(),
            description: String::new(),
            image: DEFAULT_IMAGE.to_string(),
        }
    }

    /// Check if the house declares this nationality
    pub fn declares(&self, nationality: &str) -> bool {
        self.nationality.as_deref() == Some(nationality)
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: HouseDetailsPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(nationality) = patch.nationality {
            self.nationality = normalize_nationality(nationality);
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// Blank labels mean "no nationality"
fn normalize_nationality(nationality: Option<String>) -> Option<String> {
    nationality.and_then(|n| {
        let trimmed = n.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Partial update of a house profile; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDetailsPatch {
    /// New display name
    pub name: Option<String>,
    /// New nationality label; `Some(None)` or a blank label clears it
    pub nationality: Option<Option<String>>,
    /// New director name
    pub director: Option<String>,
    /// New address
    pub location: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New image reference
    pub image: Option<String>,
}

/// Everything needed to add a house to the complex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDraft {
    /// Descriptive details
    pub profile: HouseProfile,
    /// One capacity per room; the configured default layout is used when empty
    pub capacities: Vec<u32>,
}

impl HouseDraft {
    /// Create a draft using the default room layout
    pub fn new(profile: HouseProfile) -> Self {
        Self { profile, capacities: Vec::new() }
    }

    /// Set explicit room capacities
    pub fn with_capacities(mut self, capacities: Vec<u32>) -> Self {
        self.capacities = capacities;
        self
    }
}

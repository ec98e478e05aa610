use std::fmt;

use crate::models::result::LogoVariant;

/// One rendered variant.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryTile {
    pub id: String,
    pub url: String,
    /// Score with two decimals, e.g. `0.92`.
    pub score_label: String,
    pub model: String,
    pub prompt: String,
}

impl From<&LogoVariant> for GalleryTile {
    fn from(variant: &LogoVariant) -> Self {
        Self {
            id: variant.id.clone(),
            url: variant.url.clone(),
            score_label: format!("{:.2}", variant.score),
            model: variant.metadata.model.clone(),
            prompt: variant.metadata.prompt.clone(),
        }
    }
}

/// Variants in the order the generator returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gallery {
    tiles: Vec<GalleryTile>,
}

impl Gallery {
    pub fn from_variants(variants: &[LogoVariant]) -> Self {
        Self {
            tiles: variants.iter().map(GalleryTile::from).collect(),
        }
    }

    pub fn tiles(&self) -> &[GalleryTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl fmt::Display for Gallery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} variations generated", self.tiles.len())?;
        for (index, tile) in self.tiles.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "#{} [{}] Score: {}", index + 1, tile.id, tile.score_label)?;
            writeln!(f, "  {}", tile.url)?;
            if !tile.prompt.is_empty() {
                writeln!(f, "  {}", tile.prompt)?;
            }
            if !tile.model.is_empty() {
                writeln!(f, "  model: {}", tile.model)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::VariantMetadata;

    fn variant(id: &str, score: f64) -> LogoVariant {
        LogoVariant {
            id: id.to_string(),
            url: format!("https://img.local/{id}.png"),
            score,
            metadata: VariantMetadata {
                model: "x".to_string(),
                prompt: "y".to_string(),
            },
        }
    }

    #[test]
    fn test_score_label_two_decimals() {
        let gallery = Gallery::from_variants(&[variant("1", 0.92), variant("2", 0.8765)]);
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.tiles()[0].score_label, "0.92");
        assert_eq!(gallery.tiles()[1].score_label, "0.88");
    }

    #[test]
    fn test_text_rendering() {
        let text = Gallery::from_variants(&[variant("1", 0.92)]).to_string();
        assert!(text.starts_with("1 variations generated"));
        assert!(text.contains("#1 [1] Score: 0.92"));
        assert!(text.contains("https://img.local/1.png"));
        assert!(text.contains("model: x"));
    }
}

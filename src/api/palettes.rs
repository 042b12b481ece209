use axum::response::Json;
use serde::Serialize;
use utoipa::ToSchema;

use palette_dither::presets;

/// A named preset palette.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaletteInfo {
    /// Preset key, as accepted by the `paletteType` upload field
    pub name: String,
    /// Palette colors as `#RRGGBB` strings, in matching order
    pub colors: Vec<String>,
}

/// List the available preset palettes
#[utoipa::path(
    get,
    path = "/api/palettes",
    responses(
        (status = 200, description = "All preset palettes", body = [PaletteInfo]),
    ),
    tag = "Palettes"
)]
pub async fn handle_palettes() -> Json<Vec<PaletteInfo>> {
    let palettes = presets::preset_names()
        .into_iter()
        .filter_map(|name| {
            presets::preset(name).map(|palette| PaletteInfo {
                name: name.to_string(),
                colors: palette.colors().iter().map(|c| c.to_string()).collect(),
            })
        })
        .collect();
    Json(palettes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_covers_all_presets() {
        let Json(palettes) = handle_palettes().await;
        assert_eq!(palettes.len(), presets::preset_names().len());

        let game_boy = palettes
            .iter()
            .find(|p| p.name == "gameBoy")
            .expect("gameBoy preset should be listed");
        assert_eq!(
            game_boy.colors,
            vec!["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"]
        );
    }
}

use eframe::egui::Visuals;

// ---------------------------------------------------------------------------
// App variants
// ---------------------------------------------------------------------------

/// The two cosmetic variants of the app. They share every line of
/// pipeline code and differ only in theme, panel layout, the palette
/// hue picker, and default filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Light theme, chart and table as tabs.
    Classic,
    /// Dark theme, chart stacked above the table, palette hue picker.
    Noir,
}

impl Profile {
    /// Parse a profile name from the command line. Unknown names fall
    /// back to `Classic` with a warning.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("classic") => Profile::Classic,
            Some("noir") => Profile::Noir,
            Some(other) => {
                log::warn!("unknown profile '{other}', using classic");
                Profile::Classic
            }
        }
    }

    pub fn visuals(self) -> Visuals {
        match self {
            Profile::Classic => Visuals::light(),
            Profile::Noir => Visuals::dark(),
        }
    }

    /// Whether chart and table are shown as separate tabs (classic) or
    /// stacked in one view (noir).
    pub fn tabbed(self) -> bool {
        matches!(self, Profile::Classic)
    }

    /// Whether the side panel shows the palette hue picker.
    pub fn has_hue_picker(self) -> bool {
        matches!(self, Profile::Noir)
    }

    /// Initial genus selection, intersected with the dataset's actual
    /// distinct values at startup.
    pub fn default_genera(self) -> &'static [&'static str] {
        match self {
            Profile::Classic => &["ACER", "PRUNUS", "QUERCUS"],
            Profile::Noir => &["FRAXINUS", "TILIA"],
        }
    }

    /// Initial neighbourhood selection; falls back to the dataset's
    /// first distinct value when absent from the data.
    pub fn default_neighbourhood(self) -> &'static str {
        match self {
            Profile::Classic => "KITSILANO",
            Profile::Noir => "DOWNTOWN",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Profile::Classic => "Arborview – Street Trees",
            Profile::Noir => "Arborview Noir – Street Trees",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_profiles() {
        assert_eq!(Profile::from_arg(None), Profile::Classic);
        assert_eq!(Profile::from_arg(Some("classic")), Profile::Classic);
        assert_eq!(Profile::from_arg(Some("noir")), Profile::Noir);
    }

    #[test]
    fn unknown_profile_falls_back_to_classic() {
        assert_eq!(Profile::from_arg(Some("retro")), Profile::Classic);
    }
}

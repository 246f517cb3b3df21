use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconName {
    Eye,
    EyeOff,
    EyeDisabled,
    ChevronDown,
    ChevronUp,
    Back,
    Check,
    Close,
    Plus,
    Minus,
    Edit,
    Trash,
    Save,
    Clock,
    Error,
    Note,
    FilterBars,
    CloudArrowUp,
}

impl IconName {
    pub const ALL: [Self; 18] = [
        Self::Eye,
        Self::EyeOff,
        Self::EyeDisabled,
        Self::ChevronDown,
        Self::ChevronUp,
        Self::Back,
        Self::Check,
        Self::Close,
        Self::Plus,
        Self::Minus,
        Self::Edit,
        Self::Trash,
        Self::Save,
        Self::Clock,
        Self::Error,
        Self::Note,
        Self::FilterBars,
        Self::CloudArrowUp,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eye => "eye",
            Self::EyeOff => "eye-off",
            Self::EyeDisabled => "eye-disabled",
            Self::ChevronDown => "chevron-down",
            Self::ChevronUp => "chevron-up",
            Self::Back => "back",
            Self::Check => "check",
            Self::Close => "close",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Edit => "edit",
            Self::Trash => "trash",
            Self::Save => "save",
            Self::Clock => "clock",
            Self::Error => "error",
            Self::Note => "note",
            Self::FilterBars => "filter-bars",
            Self::CloudArrowUp => "cloud-arrow-up",
        }
    }

    const fn glyph(self) -> &'static str {
        match self {
            Self::Eye => "◉",
            Self::EyeOff => "◎",
            Self::EyeDisabled => "⊘",
            Self::ChevronDown => "▾",
            Self::ChevronUp => "▴",
            Self::Back => "←",
            Self::Check => "✔",
            Self::Close => "✕",
            Self::Plus => "+",
            Self::Minus => "−",
            Self::Edit => "✎",
            Self::Trash => "🗑",
            Self::Save => "💾",
            Self::Clock => "◷",
            Self::Error => "⚠",
            Self::Note => "✉",
            Self::FilterBars => "☰",
            Self::CloudArrowUp => "⇪",
        }
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown icon: {0}")]
pub struct UnknownIcon(pub String);

impl FromStr for IconName {
    type Err = UnknownIcon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownIcon(s.to_string()))
    }
}

/// A renderable icon asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub name: IconName,
    pub glyph: &'static str,
}

static ICONS: LazyLock<HashMap<IconName, Icon>> = LazyLock::new(|| {
    tracing::debug!("loading icon set");
    IconName::ALL
        .into_iter()
        .map(|name| {
            let icon = Icon {
                name,
                glyph: name.glyph(),
            };
            (name, icon)
        })
        .collect()
});

pub fn get_icon_component(name: &str) -> Option<&'static Icon> {
    let name = name.parse::<IconName>().ok()?;
    ICONS.get(&name)
}

pub fn get_available_icons() -> Vec<IconName> {
    IconName::ALL.to_vec()
}

/// Glyph for a known icon, for direct use in rendering.
pub fn glyph(name: IconName) -> &'static str {
    get_icon_component(name.as_str()).map_or("?", |icon| icon.glyph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn looks_up_registered_names() {
        let icon = get_icon_component("chevron-down").unwrap();
        assert_eq!(icon.name, IconName::ChevronDown);
        assert_eq!(icon.glyph, "▾");
    }

    #[test]
    fn unknown_names_return_none() {
        assert_eq!(get_icon_component("rocket"), None);
        assert_eq!(get_icon_component(""), None);
        assert_eq!(get_icon_component("Eye"), None);
    }

    #[test]
    fn lists_every_icon_once_in_declaration_order() {
        let names: Vec<String> = get_available_icons().iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), 18);
        assert_eq!(names.first().map(String::as_str), Some("eye"));
        assert_eq!(names.last().map(String::as_str), Some("cloud-arrow-up"));
        for name in &names {
            assert!(get_icon_component(name).is_some(), "{name} not registered");
        }
    }
}

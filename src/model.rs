//! Stored records: accounts and snippets, plus the fixed language and style choices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type AccountId = i64;
pub type SnippetId = i64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub created: DateTime<Utc>,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: Language,
    pub style: Style,
    pub owner: AccountId,
    /// Username of `owner`, joined in by the store.
    pub owner_username: String,
    pub highlighted: String,
}

/// Fields the store needs to insert a snippet. `highlighted` is rendered before insert.
#[derive(Clone, Debug)]
pub struct NewSnippet {
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: Language,
    pub style: Style,
    pub owner: AccountId,
    pub highlighted: String,
}

/// Full replacement of the mutable snippet fields. Owner, id and created never change.
#[derive(Clone, Debug)]
pub struct SnippetChanges {
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: Language,
    pub style: Style,
    pub highlighted: String,
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, default = $default:ident, { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $tag)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    _ => Err(UnknownChoice(s.to_string())),
                }
            }
        }
    };
}

/// Input that is not one of the allowed choice tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" is not a valid choice.", self.0)
    }
}

choice_enum!(
    /// Source language of a snippet.
    Language, default = Python, {
        Bash => "bash",
        C => "c",
        Cpp => "cpp",
        Css => "css",
        Go => "go",
        Haskell => "haskell",
        Html => "html",
        Java => "java",
        JavaScript => "javascript",
        Json => "json",
        Lua => "lua",
        Markdown => "markdown",
        Perl => "perl",
        Php => "php",
        Python => "python",
        Ruby => "ruby",
        Rust => "rust",
        Sql => "sql",
        Text => "text",
        Yaml => "yaml",
    }
);

choice_enum!(
    /// Colour scheme used when rendering the highlighted view.
    Style, default = Friendly, {
        Friendly => "friendly",
        SolarizedDark => "solarized-dark",
        SolarizedLight => "solarized-light",
        OceanDark => "ocean-dark",
        OceanLight => "ocean-light",
        Eighties => "eighties",
        Mocha => "mocha",
    }
);

impl Language {
    /// Token the highlighter resolves to a syntax definition (extension or name).
    pub fn syntax_token(&self) -> &'static str {
        match self {
            Language::Bash => "sh",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Css => "css",
            Language::Go => "go",
            Language::Haskell => "hs",
            Language::Html => "html",
            Language::Java => "java",
            Language::JavaScript => "js",
            Language::Json => "json",
            Language::Lua => "lua",
            Language::Markdown => "md",
            Language::Perl => "pl",
            Language::Php => "php",
            Language::Python => "py",
            Language::Ruby => "rb",
            Language::Rust => "rs",
            Language::Sql => "sql",
            Language::Text => "txt",
            Language::Yaml => "yaml",
        }
    }
}

impl Style {
    /// Name of the bundled theme backing this style.
    pub fn theme_name(&self) -> &'static str {
        match self {
            Style::Friendly => "InspiredGitHub",
            Style::SolarizedDark => "Solarized (dark)",
            Style::SolarizedLight => "Solarized (light)",
            Style::OceanDark => "base16-ocean.dark",
            Style::OceanLight => "base16-ocean.light",
            Style::Eighties => "base16-eighties.dark",
            Style::Mocha => "base16-mocha.dark",
        }
    }
}

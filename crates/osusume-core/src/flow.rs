//! Top-level choice of input modality and recommendation cardinality.

use serde::{Deserialize, Serialize};

use crate::selection::Cardinality;

pub const MANUAL_PLACEHOLDER: &str = "Manual input form coming soon...";

/// Where picks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Search the catalog.
    Api,
    /// Free-form entry (not built yet).
    Manual,
}

impl InputMode {
    pub const ALL: [InputMode; 2] = [InputMode::Api, InputMode::Manual];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Api => "Search via API",
            Self::Manual => "Manual Input",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    ChooseInput(InputMode),
    ClearInput,
    ChooseCardinality(Cardinality),
}

/// What changed, so the caller can reset the views that were replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowChange {
    Unchanged,
    Input(Option<InputMode>),
    Cardinality(Cardinality),
}

/// Which view is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "with", rename_all = "snake_case")]
pub enum Screen {
    ChooseInput,
    ChooseCardinality(InputMode),
    ApiSearch(Cardinality),
    ManualPlaceholder(Cardinality),
}

impl Screen {
    pub fn shows_search(&self) -> bool {
        matches!(self, Self::ApiSearch(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSelector {
    input: Option<InputMode>,
    cardinality: Option<Cardinality>,
}

impl FlowSelector {
    pub fn input(&self) -> Option<InputMode> {
        self.input
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        self.cardinality
    }

    pub fn update(&mut self, msg: Message) -> FlowChange {
        match msg {
            Message::ChooseInput(mode) => self.set_input(Some(mode)),
            Message::ClearInput => self.set_input(None),
            Message::ChooseCardinality(cardinality) => {
                if self.input.is_none() || self.cardinality == Some(cardinality) {
                    return FlowChange::Unchanged;
                }
                self.cardinality = Some(cardinality);
                FlowChange::Cardinality(cardinality)
            }
        }
    }

    fn set_input(&mut self, input: Option<InputMode>) -> FlowChange {
        if self.input == input {
            return FlowChange::Unchanged;
        }
        self.input = input;
        if input.is_none() {
            self.cardinality = None;
        }
        FlowChange::Input(input)
    }

    pub fn screen(&self) -> Screen {
        match (self.input, self.cardinality) {
            (None, _) => Screen::ChooseInput,
            (Some(mode), None) => Screen::ChooseCardinality(mode),
            (Some(InputMode::Api), Some(c)) => Screen::ApiSearch(c),
            (Some(InputMode::Manual), Some(c)) => Screen::ManualPlaceholder(c),
        }
    }
}

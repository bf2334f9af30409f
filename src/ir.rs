use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// One version of a flow: the trigger-headed step chain plus free-floating notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowVersion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    #[default]
    Empty,
    PieceTrigger,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub kind: TriggerKind,
    #[serde(default = "default_true")]
    pub valid: bool,
    #[serde(default)]
    pub next_action: Option<Box<Action>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAction")]
pub struct Action {
    pub name: String,
    pub display_name: String,
    pub valid: bool,
    pub skip: bool,
    #[serde(flatten)]
    pub kind: ActionKind,
    pub next_action: Option<Box<Action>>,
}

/// Flat wire shape of an action. Reading `type` as a plain field instead of
/// through a flattened tagged enum keeps deserialization free of buffering,
/// so deeply nested input stays on the stack-growing path of `parse_flow`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default = "default_true")]
    valid: bool,
    #[serde(default)]
    skip: bool,
    #[serde(rename = "type")]
    action_type: ActionType,
    #[serde(default)]
    first_loop_action: Option<Box<Action>>,
    #[serde(default)]
    children: Vec<Option<Action>>,
    #[serde(default)]
    branches: Vec<RouterBranch>,
    #[serde(default)]
    next_action: Option<Box<Action>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum ActionType {
    Code,
    Piece,
    LoopOnItems,
    Router,
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        let kind = match raw.action_type {
            ActionType::Code => ActionKind::Code,
            ActionType::Piece => ActionKind::Piece,
            ActionType::LoopOnItems => ActionKind::LoopOnItems {
                first_loop_action: raw.first_loop_action,
            },
            ActionType::Router => ActionKind::Router {
                children: raw.children,
                branches: raw.branches,
            },
        };
        Self {
            name: raw.name,
            display_name: raw.display_name,
            valid: raw.valid,
            skip: raw.skip,
            kind,
            next_action: raw.next_action,
        }
    }
}

// Chains can be thousands of steps long; the derived drop glue would recurse
// once per step.
impl Drop for Action {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut action) = pending.pop() {
            detach_children(&mut action, &mut pending);
        }
    }
}

fn detach_children(action: &mut Action, pending: &mut Vec<Box<Action>>) {
    pending.extend(action.next_action.take());
    match &mut action.kind {
        ActionKind::LoopOnItems { first_loop_action } => pending.extend(first_loop_action.take()),
        ActionKind::Router { children, .. } => {
            pending.extend(std::mem::take(children).into_iter().flatten().map(Box::new))
        }
        ActionKind::Code | ActionKind::Piece => {}
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ActionKind {
    Code,
    Piece,
    LoopOnItems {
        first_loop_action: Option<Box<Action>>,
    },
    Router {
        children: Vec<Option<Action>>,
        branches: Vec<RouterBranch>,
    },
}

impl ActionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionKind::Code => "CODE",
            ActionKind::Piece => "PIECE",
            ActionKind::LoopOnItems { .. } => "LOOP_ON_ITEMS",
            ActionKind::Router { .. } => "ROUTER",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterBranch {
    #[serde(default)]
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Orange,
    Red,
    Green,
    Blue,
    Purple,
    #[default]
    Yellow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: NoteColor,
    pub position: Position,
    pub size: Size,
}

fn default_true() -> bool {
    true
}

/// Borrowed view over either kind of step so the builder can walk a chain
/// without caring whether its head is the trigger.
#[derive(Debug, Clone, Copy)]
pub enum StepRef<'a> {
    Trigger(&'a Trigger),
    Action(&'a Action),
}

impl<'a> StepRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            StepRef::Trigger(trigger) => &trigger.name,
            StepRef::Action(action) => &action.name,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match self {
            StepRef::Trigger(trigger) => &trigger.display_name,
            StepRef::Action(action) => &action.display_name,
        }
    }

    pub fn next_action(&self) -> Option<&'a Action> {
        match self {
            StepRef::Trigger(trigger) => trigger.next_action.as_deref(),
            StepRef::Action(action) => action.next_action.as_deref(),
        }
    }

    pub fn action_kind(&self) -> Option<&'a ActionKind> {
        match self {
            StepRef::Trigger(_) => None,
            StepRef::Action(action) => Some(&action.kind),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StepRef::Trigger(trigger) => match trigger.kind {
                TriggerKind::Empty => "EMPTY",
                TriggerKind::PieceTrigger => "PIECE_TRIGGER",
            },
            StepRef::Action(action) => action.kind.type_name(),
        }
    }

    pub fn valid(&self) -> bool {
        match self {
            StepRef::Trigger(trigger) => trigger.valid,
            StepRef::Action(action) => action.valid,
        }
    }

    pub fn skip(&self) -> bool {
        match self {
            StepRef::Trigger(_) => false,
            StepRef::Action(action) => action.skip,
        }
    }
}

impl<'a> From<&'a Trigger> for StepRef<'a> {
    fn from(trigger: &'a Trigger) -> Self {
        StepRef::Trigger(trigger)
    }
}

impl<'a> From<&'a Action> for StepRef<'a> {
    fn from(action: &'a Action) -> Self {
        StepRef::Action(action)
    }
}

impl Trigger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            kind: TriggerKind::Empty,
            valid: true,
            next_action: None,
        }
    }

    pub fn then(mut self, action: Action) -> Self {
        self.next_action = Some(Box::new(action));
        self
    }
}

impl Action {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            valid: true,
            skip: false,
            kind,
            next_action: None,
        }
    }

    pub fn code(name: impl Into<String>) -> Self {
        Self::new(name, ActionKind::Code)
    }

    pub fn looping(name: impl Into<String>, body: Option<Action>) -> Self {
        Self::new(
            name,
            ActionKind::LoopOnItems {
                first_loop_action: body.map(Box::new),
            },
        )
    }

    pub fn router(name: impl Into<String>, children: Vec<Option<Action>>) -> Self {
        let branches = vec![RouterBranch::default(); children.len()];
        Self::new(name, ActionKind::Router { children, branches })
    }

    pub fn then(mut self, action: Action) -> Self {
        self.next_action = Some(Box::new(action));
        self
    }
}

impl FlowVersion {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            id: None,
            display_name: String::new(),
            trigger,
            notes: Vec::new(),
        }
    }
}

/// Parses a flow version from JSON. Nesting is not capped: the recursion
/// limit is lifted and the stack grows on demand, so long chains and deep
/// loop/router nesting both parse.
pub fn parse_flow(input: &str) -> Result<FlowVersion, serde_json::Error> {
    let mut json = serde_json::Deserializer::from_str(input);
    json.disable_recursion_limit();
    let flow = FlowVersion::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(flow)
}

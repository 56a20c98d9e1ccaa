//! @ai:module:intent Define the doc-comment event stream and the observer table that routes it
//! @ai:module:layer domain
//! @ai:module:public_api Tag, Event, EventSink, Dispatcher, HandlerId
//! @ai:module:stateless false

use std::collections::HashMap;
use std::fmt;

/// @ai:intent Every tag kind the aggregator understands, plus a fallback for the rest
/// @ai:invariant Tag::from_name(t.name()) == t for every variant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Start of a doc comment (`/**`)
    Open,
    /// End of a doc comment (`*/`)
    Close,
    /// Synthetic event carrying the leading free text
    Description,
    Name,
    Function,
    Class,
    Object,
    Field,
    Param,
    Return,
    Private,
    Deprecated,
    Namespace,
    Custom(String),
}

impl Tag {
    pub const OPEN_MARKER: &'static str = "/**";
    pub const CLOSE_MARKER: &'static str = "*/";

    /// @ai:intent Map a raw tag name onto its kind
    /// @ai:example ("param") -> Tag::Param
    /// @ai:example ("since") -> Tag::Custom("since")
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Self {
        match name {
            Self::OPEN_MARKER => Tag::Open,
            Self::CLOSE_MARKER => Tag::Close,
            "description" => Tag::Description,
            "name" => Tag::Name,
            "function" => Tag::Function,
            "class" => Tag::Class,
            "object" => Tag::Object,
            "field" => Tag::Field,
            "param" => Tag::Param,
            "return" => Tag::Return,
            "private" => Tag::Private,
            "deprecated" => Tag::Deprecated,
            "namespace" => Tag::Namespace,
            other => Tag::Custom(other.to_string()),
        }
    }

    /// @ai:intent Get the tag name as it appears in source
    /// @ai:effects pure
    pub fn name(&self) -> &str {
        match self {
            Tag::Open => Self::OPEN_MARKER,
            Tag::Close => Self::CLOSE_MARKER,
            Tag::Description => "description",
            Tag::Name => "name",
            Tag::Function => "function",
            Tag::Class => "class",
            Tag::Object => "object",
            Tag::Field => "field",
            Tag::Param => "param",
            Tag::Return => "return",
            Tag::Private => "private",
            Tag::Deprecated => "deprecated",
            Tag::Namespace => "namespace",
            Tag::Custom(name) => name,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// @ai:intent One item of the per-comment event stream
/// @ai:invariant value carries no surrounding whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub tag: Tag,
    pub value: String,
}

impl Event {
    /// @ai:intent Build an event, trimming the value
    pub fn new(tag: Tag, value: &str) -> Self {
        Self {
            tag,
            value: value.trim().to_string(),
        }
    }

    /// @ai:intent Build an event from a raw tag name and value, trimming both
    pub fn from_raw(name: &str, value: &str) -> Self {
        Self::new(Tag::from_name(name.trim()), value)
    }

    pub fn open() -> Self {
        Self::new(Tag::Open, "")
    }

    pub fn close() -> Self {
        Self::new(Tag::Close, "")
    }
}

/// @ai:intent Receiver of scanner events
/// @ai:context Implementations observe only; they cannot influence the scan position
pub trait EventSink {
    fn accept(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn accept(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// @ai:intent Opaque handle returned on registration, used to deregister one handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type Handler<'a> = Box<dyn FnMut(&Event) + 'a>;

/// @ai:intent Route events to handlers registered per tag or for every tag
/// @ai:invariant tag-specific handlers run before wildcard handlers, each group in registration order
#[derive(Default)]
pub struct Dispatcher<'a> {
    next_id: u64,
    by_tag: HashMap<Tag, Vec<(HandlerId, Handler<'a>)>>,
    wildcard: Vec<(HandlerId, Handler<'a>)>,
}

impl<'a> Dispatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Register a handler for one tag kind
    /// @ai:effects state:write
    pub fn on(&mut self, tag: Tag, handler: impl FnMut(&Event) + 'a) -> HandlerId {
        let id = self.allocate_id();
        self.by_tag
            .entry(tag)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// @ai:intent Register a handler that sees every event
    /// @ai:effects state:write
    pub fn on_any(&mut self, handler: impl FnMut(&Event) + 'a) -> HandlerId {
        let id = self.allocate_id();
        self.wildcard.push((id, Box::new(handler)));
        id
    }

    /// @ai:intent Deregister a single handler
    /// @ai:post returns true if the handler was registered
    /// @ai:effects state:write
    pub fn off(&mut self, id: HandlerId) -> bool {
        if let Some(pos) = self.wildcard.iter().position(|(h, _)| *h == id) {
            self.wildcard.remove(pos);
            return true;
        }

        for handlers in self.by_tag.values_mut() {
            if let Some(pos) = handlers.iter().position(|(h, _)| *h == id) {
                handlers.remove(pos);
                return true;
            }
        }

        false
    }

    /// @ai:intent Deregister every handler bound to one tag kind
    /// @ai:post returns how many handlers were removed
    /// @ai:effects state:write
    pub fn off_tag(&mut self, tag: &Tag) -> usize {
        self.by_tag.remove(tag).map_or(0, |handlers| handlers.len())
    }

    /// @ai:intent Deregister every wildcard handler
    /// @ai:effects state:write
    pub fn off_any(&mut self) -> usize {
        let removed = self.wildcard.len();
        self.wildcard.clear();
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.wildcard.is_empty() && self.by_tag.values().all(|h| h.is_empty())
    }

    /// @ai:intent Invoke the handlers for an event synchronously
    /// @ai:effects calls registered handlers
    pub fn dispatch(&mut self, event: &Event) {
        if let Some(handlers) = self.by_tag.get_mut(&event.tag) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }

        for (_, handler) in self.wildcard.iter_mut() {
            handler(event);
        }
    }

    fn allocate_id(&mut self) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl EventSink for Dispatcher<'_> {
    fn accept(&mut self, event: &Event) {
        self.dispatch(event);
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tagged: usize = self.by_tag.values().map(Vec::len).sum();
        f.debug_struct("Dispatcher")
            .field("tagged_handlers", &tagged)
            .field("wildcard_handlers", &self.wildcard.len())
            .finish()
    }
}

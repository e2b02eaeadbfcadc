use crate::adapter::ObjectAdapter;
use crate::context::{GetContext, SetContext};
use serde_json::Value;
use splash_fields::FieldsFactory;

/// Declares fields on the schema builder.
pub type BuildHandler<A> = fn(&A, &mut FieldsFactory<'_>);

/// Called with `(key, field id)` for every unclaimed requested field.
pub type GetHandler<A> = fn(&A, &mut GetContext<'_, <A as ObjectAdapter>::Target>, &str, &str);

/// Called with `(field id, value)` for every unclaimed submitted field.
pub type SetHandler<A> = fn(&mut A, &mut SetContext<'_, <A as ObjectAdapter>::Target>, &str, &Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    BuildSchema,
    Get,
    Set,
}

pub enum Handler<A: ObjectAdapter> {
    Build(BuildHandler<A>),
    Get(GetHandler<A>),
    Set(SetHandler<A>),
}

impl<A: ObjectAdapter> Handler<A> {
    pub fn phase(&self) -> Phase {
        match self {
            Handler::Build(_) => Phase::BuildSchema,
            Handler::Get(_) => Phase::Get,
            Handler::Set(_) => Phase::Set,
        }
    }
}

impl<A: ObjectAdapter> Clone for Handler<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ObjectAdapter> Copy for Handler<A> {}

/// Ordered `(phase, handler)` list of one adapter type.
///
/// ```ignore
/// HandlerRegistry::new()
///     .on_build(Products::build_core_fields)
///     .on_get(Products::get_core_fields)
///     .on_set(Products::set_core_fields)
/// ```
pub struct HandlerRegistry<A: ObjectAdapter> {
    handlers: Vec<Handler<A>>,
}

impl<A: ObjectAdapter> Default for HandlerRegistry<A> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<A: ObjectAdapter> HandlerRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_build(mut self, handler: BuildHandler<A>) -> Self {
        self.handlers.push(Handler::Build(handler));
        self
    }

    pub fn on_get(mut self, handler: GetHandler<A>) -> Self {
        self.handlers.push(Handler::Get(handler));
        self
    }

    pub fn on_set(mut self, handler: SetHandler<A>) -> Self {
        self.handlers.push(Handler::Set(handler));
        self
    }

    pub fn push(&mut self, handler: Handler<A>) {
        self.handlers.push(handler);
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.handlers.iter().filter(|h| h.phase() == phase).count()
    }

    pub fn builders(&self) -> impl Iterator<Item = BuildHandler<A>> + '_ {
        self.handlers.iter().filter_map(|h| match h {
            Handler::Build(f) => Some(*f),
            _ => None,
        })
    }

    pub fn getters(&self) -> impl Iterator<Item = GetHandler<A>> + '_ {
        self.handlers.iter().filter_map(|h| match h {
            Handler::Get(f) => Some(*f),
            _ => None,
        })
    }

    pub fn setters(&self) -> impl Iterator<Item = SetHandler<A>> + '_ {
        self.handlers.iter().filter_map(|h| match h {
            Handler::Set(f) => Some(*f),
            _ => None,
        })
    }
}

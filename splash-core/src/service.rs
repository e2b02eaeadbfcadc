use serde_json::{Map, Value};
use splash_dispatch::{DispatchError, FieldValues, ObjectAdapter, ObjectDispatcher, RequestedFields};
use splash_types::field::FieldDescriptor;

/// Object type as seen by the task pipeline.
pub trait ObjectService {
    fn object_type(&self) -> &str;

    fn fields(&self) -> Result<Vec<FieldDescriptor>, DispatchError>;

    fn get(
        &mut self,
        id: &str,
        requested: RequestedFields,
    ) -> Result<Map<String, Value>, DispatchError>;

    fn set(&mut self, id: Option<&str>, values: FieldValues) -> Result<String, DispatchError>;
}

impl<A: ObjectAdapter> ObjectService for ObjectDispatcher<A> {
    fn object_type(&self) -> &str {
        ObjectDispatcher::object_type(self)
    }

    fn fields(&self) -> Result<Vec<FieldDescriptor>, DispatchError> {
        ObjectDispatcher::fields(self)
    }

    fn get(
        &mut self,
        id: &str,
        requested: RequestedFields,
    ) -> Result<Map<String, Value>, DispatchError> {
        ObjectDispatcher::get(self, id, requested)
    }

    fn set(&mut self, id: Option<&str>, values: FieldValues) -> Result<String, DispatchError> {
        ObjectDispatcher::set(self, id, values)
    }
}

mod definition;
mod description;
mod directive;
mod field;
mod location;
mod name;
mod type_ref;
mod value;

pub use definition::{
    Definition, DefinitionKey, DefinitionKind, DirectiveDefinition, EnumType, InputObjectType,
    InterfaceType, ObjectType, RootOperation, ScalarType, SchemaDefinition, UnionType,
};
pub use description::{merge_description, Description, DescriptionPolicy, DescriptionStyle};
pub use directive::{union_directives, Argument, Directive, DirectiveUnion};
pub use field::{
    same_argument_signature, EnumValueDefinition, FieldDefinition, InputValueDefinition,
};
pub use location::{DirectiveLocation, OperationType, UnknownLocation};
pub use name::{is_valid_name, Name};
pub use type_ref::TypeRef;
pub use value::{escape_string, Value};

use gqlmerge_core::types::{
    escape_string, Definition, Description, DescriptionStyle, Directive, DirectiveDefinition,
    EnumType, FieldDefinition, InputObjectType, InputValueDefinition, ObjectType, ScalarType,
    SchemaDefinition, UnionType,
};

/// Layout settings for printed SDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// One level of indentation.
    pub indent: String,
    /// Text placed between consecutive top-level blocks.
    pub separator: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            separator: "\n".to_string(),
        }
    }
}

impl PrintOptions {
    /// Uses `width` spaces per indentation level.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

/// Print a single definition to SDL text with default layout.
pub fn print(definition: &Definition) -> String {
    print_with([definition], &PrintOptions::default())
}

/// Print multiple definitions with default layout, separated by blank lines.
pub fn print_all(definitions: &[Definition]) -> String {
    print_with(definitions, &PrintOptions::default())
}

/// Print definitions in order. Every block ends with a newline and blocks
/// are joined with `options.separator`.
///
/// # Panics
///
/// Panics on an extension that wraps a directive definition or another
/// extension; the parser never produces either.
pub fn print_with<'a>(
    definitions: impl IntoIterator<Item = &'a Definition>,
    options: &PrintOptions,
) -> String {
    let mut output = String::new();
    for (i, definition) in definitions.into_iter().enumerate() {
        if i > 0 {
            output.push_str(&options.separator);
        }
        Printer {
            indent: &options.indent,
            output: &mut output,
        }
        .definition(definition);
    }
    output
}

struct Printer<'a> {
    indent: &'a str,
    output: &'a mut String,
}

impl Printer<'_> {
    fn definition(&mut self, definition: &Definition) {
        match definition {
            Definition::Extension(inner) => match **inner {
                Definition::Directive(_) | Definition::Extension(_) => {
                    panic!("cannot print an extension of {}", inner.kind())
                }
                _ => {
                    self.output.push_str("extend ");
                    self.body(inner);
                }
            },
            other => {
                self.description(other.description(), 0);
                self.body(other);
            }
        }
    }

    fn body(&mut self, definition: &Definition) {
        match definition {
            Definition::Scalar(scalar) => self.scalar(scalar),
            Definition::Object(object) => self.object("type", object),
            Definition::Interface(interface) => self.object("interface", interface),
            Definition::Union(union) => self.union(union),
            Definition::Enum(enum_type) => self.enum_type(enum_type),
            Definition::InputObject(input) => self.input_object(input),
            Definition::Directive(directive) => self.directive_definition(directive),
            Definition::Schema(schema) => self.schema(schema),
            Definition::Extension(inner) => {
                panic!("cannot print a nested extension of {}", inner.kind())
            }
        }
    }

    fn scalar(&mut self, scalar: &ScalarType) {
        self.output.push_str("scalar ");
        self.output.push_str(scalar.name.as_str());
        self.directives(&scalar.directives);
        self.output.push('\n');
    }

    fn object(&mut self, keyword: &str, object: &ObjectType) {
        self.output.push_str(keyword);
        self.output.push(' ');
        self.output.push_str(object.name.as_str());
        if !object.interfaces.is_empty() {
            let interfaces: Vec<&str> = object.interfaces.iter().map(|n| n.as_str()).collect();
            self.output.push_str(" implements ");
            self.output.push_str(&interfaces.join(" & "));
        }
        self.directives(&object.directives);

        if object.fields.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(" {\n");
        for field in &object.fields {
            self.field(field);
        }
        self.output.push_str("}\n");
    }

    fn field(&mut self, field: &FieldDefinition) {
        self.description(field.description.as_ref(), 1);
        self.pad(1);
        self.output.push_str(field.name.as_str());
        self.arguments(&field.arguments, 1);
        self.output.push_str(": ");
        self.output.push_str(&field.ty.to_string());
        self.directives(&field.directives);
        self.output.push('\n');
    }

    /// Arguments print inline unless one of them carries a description.
    fn arguments(&mut self, arguments: &[InputValueDefinition], depth: usize) {
        if arguments.is_empty() {
            return;
        }

        if arguments.iter().any(|a| a.description.is_some()) {
            self.output.push_str("(\n");
            for argument in arguments {
                self.description(argument.description.as_ref(), depth + 1);
                self.pad(depth + 1);
                self.input_value(argument);
                self.output.push('\n');
            }
            self.pad(depth);
            self.output.push(')');
        } else {
            self.output.push('(');
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                self.input_value(argument);
            }
            self.output.push(')');
        }
    }

    fn input_value(&mut self, value: &InputValueDefinition) {
        self.output.push_str(value.name.as_str());
        self.output.push_str(": ");
        self.output.push_str(&value.ty.to_string());
        if let Some(default) = &value.default_value {
            self.output.push_str(" = ");
            self.output.push_str(&default.to_string());
        }
        self.directives(&value.directives);
    }

    fn union(&mut self, union: &UnionType) {
        self.output.push_str("union ");
        self.output.push_str(union.name.as_str());
        self.directives(&union.directives);
        if !union.members.is_empty() {
            let members: Vec<&str> = union.members.iter().map(|n| n.as_str()).collect();
            self.output.push_str(" = ");
            self.output.push_str(&members.join(" | "));
        }
        self.output.push('\n');
    }

    fn enum_type(&mut self, enum_type: &EnumType) {
        self.output.push_str("enum ");
        self.output.push_str(enum_type.name.as_str());
        self.directives(&enum_type.directives);

        if enum_type.values.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(" {\n");
        for value in &enum_type.values {
            self.description(value.description.as_ref(), 1);
            self.pad(1);
            self.output.push_str(value.name.as_str());
            self.directives(&value.directives);
            self.output.push('\n');
        }
        self.output.push_str("}\n");
    }

    fn input_object(&mut self, input: &InputObjectType) {
        self.output.push_str("input ");
        self.output.push_str(input.name.as_str());
        self.directives(&input.directives);

        if input.fields.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(" {\n");
        for field in &input.fields {
            self.description(field.description.as_ref(), 1);
            self.pad(1);
            self.input_value(field);
            self.output.push('\n');
        }
        self.output.push_str("}\n");
    }

    fn directive_definition(&mut self, directive: &DirectiveDefinition) {
        self.output.push_str("directive @");
        self.output.push_str(directive.name.as_str());
        self.arguments(&directive.arguments, 0);
        if directive.repeatable {
            self.output.push_str(" repeatable");
        }
        let locations: Vec<&str> = directive.locations.iter().map(|l| l.as_str()).collect();
        self.output.push_str(" on ");
        self.output.push_str(&locations.join(" | "));
        self.output.push('\n');
    }

    fn schema(&mut self, schema: &SchemaDefinition) {
        self.output.push_str("schema");
        self.directives(&schema.directives);

        if schema.root_operations.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(" {\n");
        for root in &schema.root_operations {
            self.pad(1);
            self.output.push_str(root.operation.as_str());
            self.output.push_str(": ");
            self.output.push_str(root.named_type.as_str());
            self.output.push('\n');
        }
        self.output.push_str("}\n");
    }

    fn directives(&mut self, directives: &[Directive]) {
        for directive in directives {
            self.output.push(' ');
            self.output.push_str(&directive.to_string());
        }
    }

    /// Writes a description on its own lines in the style it was read in.
    fn description(&mut self, description: Option<&Description>, depth: usize) {
        let Some(description) = description else {
            return;
        };

        match description.style {
            DescriptionStyle::Block => {
                let mut lines = description.text.split('\n');
                self.pad(depth);
                self.output.push_str(r#"""""#);
                // A first line with leading whitespace stays on the opening
                // line, where block string dedent does not reach it.
                let first = lines.next().unwrap_or("");
                if first.starts_with([' ', '\t']) {
                    self.output.push_str(&escape_block_line(first));
                    self.output.push('\n');
                } else {
                    self.output.push('\n');
                    self.block_line(first, depth);
                }
                for line in lines {
                    self.block_line(line, depth);
                }
                self.line(depth, r#"""""#);
            }
            DescriptionStyle::Quoted => {
                let quoted = format!("\"{}\"", escape_string(&description.text));
                self.line(depth, &quoted);
            }
            DescriptionStyle::Comment => {
                for line in description.text.split('\n') {
                    if line.is_empty() {
                        self.line(depth, "#");
                    } else {
                        self.line(depth, &format!("# {line}"));
                    }
                }
            }
        }
    }

    fn block_line(&mut self, line: &str, depth: usize) {
        if line.is_empty() {
            self.output.push('\n');
        } else {
            self.line(depth, &escape_block_line(line));
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.pad(depth);
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn pad(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(self.indent);
        }
    }
}

fn escape_block_line(line: &str) -> String {
    line.replace(r#"""""#, r#"\""""#)
}

//! Parser for the type expressions inside doc-comment braces.
//!
//! Grammar (informally):
//!
//! ```text
//! param    := '...' type? | type '='?
//! type     := prefixed ('|' prefixed)*
//! prefixed := '?' prefixed? | '!' prefixed | primary
//! primary  := '(' type ')' | '*' | function | record | name generic?
//! function := 'function' '(' (('this' | 'new') ':' type)? (',' param)* ')' (':' type)?
//! record   := '{' (key (':' type)? (',' key (':' type)?)*)? '}'
//! generic  := '.'? '<' type (',' type)* '>'
//! ```
//!
//! `=` and `...` are only accepted where a parameter is expected; anywhere
//! else they make the whole expression malformed.

use ambient_foundation::{
    Error, FnParam, FunctionContext, FunctionType, KeyPrimitive, Primitive, RecordField, Result,
    TypeExpr,
};

/// A parsed type together with its parameter modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamType {
    /// The type itself.
    pub expr: TypeExpr,
    /// Written with a trailing `=`.
    pub optional: bool,
    /// Written with a leading `...`.
    pub variadic: bool,
}

impl From<ParamType> for FnParam {
    fn from(param: ParamType) -> Self {
        Self {
            ty: param.expr,
            optional: param.optional,
            variadic: param.variadic,
        }
    }
}

/// Parses a type expression that may not carry parameter modifiers.
///
/// # Errors
/// Returns `MalformedDeclaration` if the text is not a valid type or uses
/// `=` / `...` outside a parameter position.
pub fn parse_type(text: &str) -> Result<TypeExpr> {
    let param = parse_param_type(text)?;
    if param.optional || param.variadic {
        return Err(Error::malformed(format!(
            "parameter modifier outside parameter position in {{{text}}}"
        )));
    }
    Ok(param.expr)
}

/// Parses a parameter type: a type optionally marked `T=` or `...T`.
///
/// # Errors
/// Returns `MalformedDeclaration` if the text is not a valid type.
pub fn parse_param_type(text: &str) -> Result<ParamType> {
    let mut parser = TypeParser::new(text);
    let param = parser.parse_param()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(param)
}

/// Deepest nesting of prefixes, parentheses, and type arguments accepted.
const MAX_DEPTH: usize = 64;

/// Recursive-descent parser over the characters of one type expression.
struct TypeParser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> TypeParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Consumes `s` (after whitespace) if it comes next.
    fn eat(&mut self, s: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: &str) -> Result<()> {
        if self.eat(s) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{s}'")))
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::malformed(format!(
            "{message} at offset {} in type {{{}}}",
            self.pos, self.text
        ))
    }

    /// Returns true if the next character ends the current type term.
    fn at_terminator(&mut self) -> bool {
        self.skip_ws();
        matches!(
            self.peek(),
            None | Some(',' | ')' | '|' | '>' | '}' | '=' | ':')
        )
    }

    fn parse_param(&mut self) -> Result<ParamType> {
        if self.eat("...") {
            let expr = if self.at_terminator() {
                TypeExpr::Any
            } else {
                self.parse_union()?
            };
            return Ok(ParamType {
                expr,
                optional: false,
                variadic: true,
            });
        }

        let expr = self.parse_union()?;
        let optional = self.eat("=");
        Ok(ParamType {
            expr,
            optional,
            variadic: false,
        })
    }

    fn parse_union(&mut self) -> Result<TypeExpr> {
        let mut members = vec![self.parse_prefixed()?];
        while self.eat("|") {
            members.push(self.parse_prefixed()?);
        }
        Ok(TypeExpr::union(members))
    }

    fn parse_prefixed(&mut self) -> Result<TypeExpr> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("type nested too deeply"));
        }
        self.depth += 1;
        let result = self.parse_prefixed_inner();
        self.depth -= 1;
        result
    }

    fn parse_prefixed_inner(&mut self) -> Result<TypeExpr> {
        if self.eat("?") {
            if self.at_terminator() {
                return Ok(TypeExpr::Any);
            }
            return Ok(TypeExpr::nullable(self.parse_prefixed()?));
        }
        if self.eat("!") {
            return self.parse_prefixed();
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<TypeExpr> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.parse_union()?;
                self.expect(")")?;
                Ok(inner)
            }
            Some('*') => {
                self.pos += 1;
                Ok(TypeExpr::Any)
            }
            Some('{') => {
                self.pos += 1;
                self.parse_record()
            }
            Some(c) if is_name_start(c) => {
                let name = self.parse_name();
                if name == "function" && self.eat("(") {
                    return self.parse_function();
                }
                let args = self.parse_generic_args()?;
                lower_named(name, args).map_err(|message| self.error(&message))
            }
            Some(c) => Err(self.error(&format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of type")),
        }
    }

    /// Parses a dotted name, stopping before a `.<` generic opener.
    fn parse_name(&mut self) -> String {
        let start = self.pos;
        loop {
            while self.peek().is_some_and(is_name_char) {
                self.pos += 1;
            }
            let rest = self.rest();
            let continues = rest.starts_with('.')
                && rest[1..].chars().next().is_some_and(is_name_start);
            if !continues {
                break;
            }
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn parse_generic_args(&mut self) -> Result<Vec<TypeExpr>> {
        let save = self.pos;
        self.skip_ws();
        if self.rest().starts_with(".<") {
            self.pos += 2;
        } else if self.rest().starts_with('<') {
            self.pos += 1;
        } else {
            self.pos = save;
            return Ok(Vec::new());
        }

        let mut args = vec![self.parse_union()?];
        while self.eat(",") {
            args.push(self.parse_union()?);
        }
        self.expect(">")?;
        Ok(args)
    }

    /// Parses the rest of `function(...)` after the opening parenthesis.
    fn parse_function(&mut self) -> Result<TypeExpr> {
        let mut context = None;
        let mut params = Vec::new();

        if !self.eat(")") {
            loop {
                if context.is_none() && params.is_empty() {
                    if self.eat_receiver("this") {
                        context = Some(FunctionContext::This(Box::new(self.parse_union()?)));
                    } else if self.eat_receiver("new") {
                        context = Some(FunctionContext::New(Box::new(self.parse_union()?)));
                    } else {
                        params.push(FnParam::from(self.parse_param()?));
                    }
                } else {
                    params.push(FnParam::from(self.parse_param()?));
                }

                if self.eat(")") {
                    break;
                }
                self.expect(",")?;
            }
        }

        check_variadic_last(&params).map_err(|message| self.error(&message))?;

        let return_type = if self.eat(":") {
            self.parse_union()?
        } else {
            TypeExpr::Any
        };

        Ok(TypeExpr::Function(FunctionType {
            context,
            params,
            return_type: Box::new(return_type),
        }))
    }

    /// Consumes `keyword:` if it comes next.
    fn eat_receiver(&mut self, keyword: &str) -> bool {
        let save = self.pos;
        if self.eat(keyword) && self.eat(":") {
            return true;
        }
        self.pos = save;
        false
    }

    /// Parses the rest of a record type after the opening brace.
    fn parse_record(&mut self) -> Result<TypeExpr> {
        let mut fields: Vec<RecordField> = Vec::new();

        if !self.eat("}") {
            loop {
                self.skip_ws();
                let name = self.parse_record_key()?;
                if fields.iter().any(|f| f.name == name) {
                    return Err(self.error(&format!("duplicate record field '{name}'")));
                }

                let (ty, nullable) = if self.eat(":") {
                    let non_null = self.eat("!");
                    (self.parse_union()?, !non_null)
                } else {
                    (TypeExpr::Any, true)
                };
                fields.push(RecordField { name, ty, nullable });

                if self.eat("}") {
                    break;
                }
                self.expect(",")?;
            }
        }

        Ok(TypeExpr::Record(fields))
    }

    fn parse_record_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                let Some(end) = self.rest().find(q) else {
                    return Err(self.error("unterminated record key"));
                };
                let key = self.rest()[..end].to_string();
                self.pos += end + 1;
                Ok(key)
            }
            Some(c) if is_name_start(c) => {
                let start = self.pos;
                while self.peek().is_some_and(is_name_char) {
                    self.pos += 1;
                }
                Ok(self.text[start..self.pos].to_string())
            }
            _ => Err(self.error("expected record field name")),
        }
    }
}

/// Turns a written name plus generic arguments into a type expression.
fn lower_named(name: String, mut args: Vec<TypeExpr>) -> std::result::Result<TypeExpr, String> {
    if let Some(primitive) = Primitive::from_name(&name) {
        if !args.is_empty() {
            return Err(format!("primitive {name} takes no type arguments"));
        }
        return Ok(TypeExpr::Primitive(primitive));
    }

    match (name.as_str(), args.len()) {
        ("Array", 0) => Ok(TypeExpr::array_of(TypeExpr::Any)),
        ("Array", 1) => Ok(TypeExpr::array_of(args.remove(0))),
        ("Array", n) => Err(format!("Array takes one type argument, got {n}")),
        ("Object", 1) => Ok(TypeExpr::map_of(KeyPrimitive::String, args.remove(0))),
        ("Object", 2) => {
            let value = args.remove(1);
            let key = match args.remove(0) {
                TypeExpr::Primitive(p) => KeyPrimitive::from_primitive(p),
                _ => None,
            }
            .ok_or_else(|| "map keys must be string or number".to_string())?;
            Ok(TypeExpr::map_of(key, value))
        }
        ("Object", n) if n > 2 => Err(format!("Object takes at most two type arguments, got {n}")),
        (_, 0) => Ok(TypeExpr::Named(name)),
        _ => Ok(TypeExpr::Applied(name, args)),
    }
}

/// Checks that at most one parameter is variadic and that it comes last.
///
/// # Errors
/// Returns a description of the violation.
pub fn check_variadic_last<T>(params: &[T]) -> std::result::Result<(), String>
where
    T: VariadicFlag,
{
    let last = params.len().saturating_sub(1);
    match params.iter().position(VariadicFlag::is_variadic) {
        Some(i) if i != last => Err(format!(
            "variadic parameter at position {} must be last of {}",
            i + 1,
            params.len()
        )),
        _ => Ok(()),
    }
}

/// Anything that may be a variadic parameter.
pub trait VariadicFlag {
    /// Returns true if this parameter collects the remaining arguments.
    fn is_variadic(&self) -> bool;
}

impl VariadicFlag for FnParam {
    fn is_variadic(&self) -> bool {
        self.variadic
    }
}

impl VariadicFlag for ParamType {
    fn is_variadic(&self) -> bool {
        self.variadic
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

use std::{fmt, rc::Rc};

use crate::interpreter::value::core::Value;

/// The built-in scalar types.
///
/// Primitive types are singletons: two primitives are the same type exactly
/// when they have the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// The type of statements and empty blocks.
    Unit,
    /// 64-bit signed integers.
    Int,
    /// 64-bit floating-point numbers.
    Double,
    /// Owned text.
    String,
    /// `true` and `false`.
    Bool,
    /// A single Unicode scalar value.
    Char,
    /// The implementing type inside a trait signature.
    SelfType,
}

impl Primitive {
    /// Every primitive, in name-table order.
    pub const ALL: [Self; 7] = [Self::Unit,
                                Self::Int,
                                Self::Double,
                                Self::String,
                                Self::Bool,
                                Self::Char,
                                Self::SelfType];

    /// Returns the source-level name of the primitive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unit => "Unit",
            Self::Int => "Int",
            Self::Double => "Double",
            Self::String => "String",
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::SelfType => "Self",
        }
    }

    /// Looks up a primitive by its source-level name.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::types::Primitive;
    ///
    /// assert_eq!(Primitive::from_name("Int"), Some(Primitive::Int));
    /// assert_eq!(Primitive::from_name("Point"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// The signature of a function value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Parameter types in order.
    pub params: Vec<Type>,
    /// The return type.
    pub ret:    Type,
}

/// A declared struct member.
#[derive(Debug, Clone)]
pub struct Member {
    /// Member name.
    pub name:    String,
    /// Declared type.
    pub ty:      Type,
    /// Whether field assignment is allowed.
    pub mutable: bool,
}

/// The descriptor registered by a `struct` declaration.
#[derive(Debug)]
pub struct StructType {
    /// The struct name.
    pub name:    String,
    /// Members in declaration order.
    pub members: Vec<Member>,
    /// Traits resolved from the `derive(...)` clause.
    pub derives: Vec<Rc<TraitType>>,
}

/// A declared enum variant.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Variant name.
    pub name:   String,
    /// Associated value types in order.
    pub fields: Vec<Type>,
}

/// The descriptor registered by an `enum` declaration.
#[derive(Debug)]
pub struct EnumType {
    /// The enum name.
    pub name:     String,
    /// Variants in declaration order.
    pub variants: Vec<Variant>,
    /// Traits resolved from the `derive(...)` clause.
    pub derives:  Vec<Rc<TraitType>>,
}

/// A trait member signature.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    /// Method name.
    pub name:   String,
    /// Parameter types.
    pub params: Vec<Type>,
    /// Return type.
    pub ret:    Type,
}

/// The descriptor registered by a `trait` declaration, or seeded as a
/// built-in trait.
#[derive(Debug)]
pub struct TraitType {
    /// The trait name.
    pub name:        String,
    /// Member signatures in declaration order.
    pub methods:     Vec<MethodSignature>,
    /// Extended traits.
    pub supertraits: Vec<Rc<Self>>,
}

impl TraitType {
    /// Creates a trait with no members and no super traits.
    #[must_use]
    pub fn marker(name: &str) -> Self {
        Self { name:        name.to_string(),
               methods:     Vec::new(),
               supertraits: Vec::new(), }
    }
}

/// The runtime type tag carried by every [`Value`].
///
/// Equality follows the registry's identity rules:
/// - primitives compare by name,
/// - function types compare structurally (parameters and return type),
/// - struct, enum and trait types compare by descriptor identity, so two
///   declarations that happen to share a shape are still different types.
#[derive(Debug, Clone)]
pub enum Type {
    /// A built-in scalar type.
    Primitive(Primitive),
    /// A function signature.
    Function(Rc<FunctionType>),
    /// A declared struct.
    Struct(Rc<StructType>),
    /// A declared enum.
    Enum(Rc<EnumType>),
    /// A declared or built-in trait.
    Trait(Rc<TraitType>),
    /// The type of `{ key: value }` literals that were never bound to a
    /// struct annotation.
    Map,
    /// A placeholder accepted by native parameters; any value conforms.
    Generic(String),
}

impl Type {
    /// `Unit`
    pub const UNIT: Self = Self::Primitive(Primitive::Unit);
    /// `Int`
    pub const INT: Self = Self::Primitive(Primitive::Int);
    /// `Double`
    pub const DOUBLE: Self = Self::Primitive(Primitive::Double);
    /// `String`
    pub const STRING: Self = Self::Primitive(Primitive::String);
    /// `Bool`
    pub const BOOL: Self = Self::Primitive(Primitive::Bool);
    /// `Char`
    pub const CHAR: Self = Self::Primitive(Primitive::Char);

    /// Builds a function type from its parts.
    #[must_use]
    pub fn function(params: Vec<Self>, ret: Self) -> Self {
        Self::Function(Rc::new(FunctionType { params, ret }))
    }

    /// Returns the type's source-level name.
    ///
    /// For function types this is the rendered signature.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Returns `true` if a value tagged with `found` may be used where `self`
    /// is expected, without any structural conversion.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::types::Type;
    ///
    /// assert!(Type::INT.accepts(&Type::INT));
    /// assert!(!Type::INT.accepts(&Type::DOUBLE));
    /// assert!(Type::Generic("T".into()).accepts(&Type::STRING));
    /// ```
    #[must_use]
    pub fn accepts(&self, found: &Self) -> bool {
        matches!(self, Self::Generic(_)) || self == found
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b) || a == b,
            (Self::Struct(a), Self::Struct(b)) => Rc::ptr_eq(a, b),
            (Self::Enum(a), Self::Enum(b)) => Rc::ptr_eq(a, b),
            (Self::Trait(a), Self::Trait(b)) => Rc::ptr_eq(a, b),
            (Self::Map, Self::Map) => true,
            (Self::Generic(a), Self::Generic(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p.name()),
            Self::Function(func) => {
                let params = func.params
                                 .iter()
                                 .map(ToString::to_string)
                                 .collect::<Vec<_>>()
                                 .join(", ");
                write!(f, "({params}) -> {}", func.ret)
            },
            Self::Struct(s) => write!(f, "{}", s.name),
            Self::Enum(e) => write!(f, "{}", e.name),
            Self::Trait(t) => write!(f, "{}", t.name),
            Self::Map => write!(f, "Map"),
            Self::Generic(name) => write!(f, "{name}"),
        }
    }
}

impl StructType {
    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Checks whether a map literal's entries can stand in for this struct.
    ///
    /// The entry list must have exactly as many entries as the struct has
    /// members. Entries are then compared position by position against the
    /// members, and the check succeeds at the first position whose key equals
    /// the member name and whose value's type renders the same as the
    /// member's type. A struct without members accepts only an empty map.
    ///
    /// # Example
    /// ```
    /// use moonpad::interpreter::value::{
    ///     core::Value,
    ///     types::{Member, StructType, Type},
    /// };
    ///
    /// let point = StructType { name:    "Point".into(),
    ///                          members: vec![Member { name:    "x".into(),
    ///                                                 ty:      Type::INT,
    ///                                                 mutable: false, },
    ///                                        Member { name:    "y".into(),
    ///                                                 ty:      Type::INT,
    ///                                                 mutable: false, }],
    ///                          derives: vec![], };
    ///
    /// let entries = vec![("x".to_string(), Value::int(1)), ("y".to_string(), Value::int(2))];
    /// assert!(point.matches_entries(&entries));
    /// assert!(!point.matches_entries(&entries[..1]));
    /// ```
    #[must_use]
    pub fn matches_entries(&self, entries: &[(String, Value)]) -> bool {
        if entries.len() != self.members.len() {
            return false;
        }
        if entries.is_empty() {
            return true;
        }

        entries.iter()
               .zip(&self.members)
               .any(|((key, value), member)| {
                   *key == member.name && value.ty.to_string() == member.ty.to_string()
               })
    }
}

impl EnumType {
    /// Looks up a variant by name.
    #[must_use]
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

//! Dispatch function generation
//!
//! Each [`DispatchKind`] produces one OpenCL C function that `switch`es on a
//! record index and calls the shader bound to that index.  For example, the
//! hit dispatch for a two-record table in the legacy calling convention is
//!
//! ```c
//! void callHit(int sbtRecordOffset, struct Payload* payload, struct HitData* hitData, struct SceneData* sceneData)
//! {
//!     int index = hitData->instanceSBTOffset + sbtRecordOffset;
//!     switch (index)
//!     {
//!         case 0: hitA(payload, hitData, sceneData); break;
//!         case 1: hitB(payload, hitData, sceneData); break;
//!         default: printf("Error: No hit shader found.");
//!     }
//! }
//! ```
//!
//! Generation is controlled by a [`Variant`], which picks the calling
//! convention and decides whether the any-hit dispatch and the error-reporting
//! `default:` branch are emitted.
use crate::table::{SbtTable, Stage};
use log::{debug, trace};

/// Preprocessor macros used to thread texture parameters through dispatch
///
/// The macros are expected to expand to nothing or to a leading-comma list,
/// e.g. `#define TEXTURE_PARAM , tex0, tex1`; they're appended after the last
/// parameter with a single space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureMacros {
    /// Macro appended to each dispatch function's parameter list
    pub ty: String,
    /// Macro appended to each shader call's argument list
    pub param: String,
}

impl Default for TextureMacros {
    fn default() -> Self {
        Self {
            ty: "TEXTURE_TYPE".to_owned(),
            param: "TEXTURE_PARAM".to_owned(),
        }
    }
}

/// Configuration for a complete set of dispatch functions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variant {
    /// Texture calling convention, or `None` for the plain convention
    pub texture: Option<TextureMacros>,
    /// Emit an any-hit dispatch function
    pub any_hit: bool,
    /// Emit a `default:` branch that reports a missing shader at runtime
    ///
    /// When this is `false`, an out-of-range index silently runs no shader.
    pub default_branch: bool,
}

impl Variant {
    /// Legacy variant: hit and miss dispatch, with an error-reporting
    /// `default:` branch and no texture parameters
    pub fn legacy() -> Self {
        Self {
            texture: None,
            any_hit: false,
            default_branch: true,
        }
    }

    /// Texture-aware variant: any-hit, hit, and miss dispatch, with texture
    /// macros and no `default:` branch
    pub fn textured() -> Self {
        Self {
            texture: Some(TextureMacros::default()),
            any_hit: true,
            default_branch: false,
        }
    }

    /// Returns the dispatch kinds generated by this variant, in output order
    pub fn kinds(&self) -> impl Iterator<Item = DispatchKind> + '_ {
        use strum::IntoEnumIterator;
        DispatchKind::iter()
            .filter(|k| self.any_hit || *k != DispatchKind::AnyHit)
    }

    /// Returns the spec for a single dispatch function in this variant
    pub fn spec(&self, kind: DispatchKind) -> DispatchSpec {
        DispatchSpec {
            kind,
            texture: self.texture.clone(),
            default_branch: self.default_branch,
        }
    }
}

/// Kind of dispatch function
///
/// Variants are declared in the order in which functions are emitted.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum DispatchKind {
    /// Any-hit dispatch, keyed by instance offset plus record offset
    #[strum(serialize = "any-hit")]
    AnyHit,
    /// Closest-hit dispatch, keyed by instance offset plus record offset
    #[strum(serialize = "hit")]
    Hit,
    /// Miss dispatch, keyed directly by the miss index
    #[strum(serialize = "miss")]
    Miss,
}

impl DispatchKind {
    /// Returns the record field which is read for this dispatch
    pub fn stage(&self) -> Stage {
        match self {
            DispatchKind::AnyHit => Stage::AnyHit,
            DispatchKind::Hit => Stage::ClosestHit,
            DispatchKind::Miss => Stage::Miss,
        }
    }

    /// Returns the name of the generated function
    pub fn function_name(&self) -> &'static str {
        match self {
            DispatchKind::AnyHit => "callAnyHit",
            DispatchKind::Hit => "callHit",
            DispatchKind::Miss => "callMiss",
        }
    }

    /// Returns a short human-readable name
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Parameters of the generated function (without texture parameters)
    fn params(&self) -> &'static str {
        match self {
            DispatchKind::AnyHit => {
                "bool* cont, int sbtRecordOffset, struct Payload* payload, \
                 struct HitData* hitData, struct SceneData* sceneData"
            }
            DispatchKind::Hit => {
                "int sbtRecordOffset, struct Payload* payload, \
                 struct HitData* hitData, struct SceneData* sceneData"
            }
            DispatchKind::Miss => {
                "int missIndex, struct Payload* payload, \
                 struct SceneData* sceneData"
            }
        }
    }

    /// Arguments passed to each shader (without texture parameters)
    fn args(&self) -> &'static str {
        match self {
            DispatchKind::AnyHit => "cont, payload, hitData, sceneData",
            DispatchKind::Hit => "payload, hitData, sceneData",
            DispatchKind::Miss => "payload, sceneData",
        }
    }

    /// Expression switched on by the generated function
    ///
    /// Hit dispatch computes a local `index` from the instance's base offset;
    /// miss dispatch uses its `missIndex` parameter directly.
    fn selector(&self) -> &'static str {
        match self {
            DispatchKind::AnyHit | DispatchKind::Hit => "index",
            DispatchKind::Miss => "missIndex",
        }
    }
}

/// Description of a single dispatch function
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchSpec {
    /// Kind of dispatch, which selects the record field and argument list
    pub kind: DispatchKind,
    /// Texture calling convention, or `None` for the plain convention
    pub texture: Option<TextureMacros>,
    /// Emit an error-reporting `default:` branch
    pub default_branch: bool,
}

impl DispatchSpec {
    /// Returns the record field which is read for this dispatch
    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }

    /// Returns the parameter list of the generated function
    pub fn params(&self) -> String {
        with_macro(self.kind.params(), self.texture.as_ref().map(|t| &t.ty))
    }

    /// Returns the argument list passed to each shader
    pub fn call_args(&self) -> String {
        with_macro(self.kind.args(), self.texture.as_ref().map(|t| &t.param))
    }

    /// Builds the dispatch function for the given table
    ///
    /// Records which don't bind this dispatch's stage contribute no branch.
    pub fn build(&self, table: &SbtTable) -> DispatchFunction {
        let branches: Vec<Branch> = table
            .bindings(self.stage())
            .map(|(index, symbol)| Branch {
                index,
                symbol: symbol.to_owned(),
            })
            .inspect(|b| {
                trace!("{}: case {} -> {}", self.kind.name(), b.index, b.symbol)
            })
            .collect();
        debug!(
            "built {} with {} of {} records bound",
            self.kind.function_name(),
            branches.len(),
            table.len()
        );
        DispatchFunction {
            spec: self.clone(),
            branches,
        }
    }
}

/// Appends a texture macro to a parameter or argument list
///
/// An empty macro name appends nothing.
fn with_macro(list: &str, mac: Option<&String>) -> String {
    match mac {
        Some(m) if !m.is_empty() => format!("{list} {m}"),
        _ => list.to_owned(),
    }
}

/// A single `case` in a dispatch `switch`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    /// Record index matched by this branch
    pub index: usize,
    /// Shader function called by this branch
    pub symbol: String,
}

/// A generated dispatch function
///
/// The function's source text is produced by its [`Display`](std::fmt::Display)
/// implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchFunction {
    spec: DispatchSpec,
    branches: Vec<Branch>,
}

impl DispatchFunction {
    /// Returns the spec used to build this function
    pub fn spec(&self) -> &DispatchSpec {
        &self.spec
    }

    /// Returns the function's kind
    pub fn kind(&self) -> DispatchKind {
        self.spec.kind
    }

    /// Returns branches in ascending index order
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }
}

impl std::fmt::Display for DispatchFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.spec.kind;
        writeln!(f, "void {}({})", kind.function_name(), self.spec.params())?;
        writeln!(f, "{{")?;
        if kind != DispatchKind::Miss {
            writeln!(
                f,
                "    int index = hitData->instanceSBTOffset + sbtRecordOffset;"
            )?;
        }
        writeln!(f, "    switch ({})", kind.selector())?;
        writeln!(f, "    {{")?;
        let args = self.spec.call_args();
        for b in &self.branches {
            writeln!(
                f,
                "        case {}: {}({args}); break;",
                b.index, b.symbol
            )?;
        }
        if self.spec.default_branch {
            writeln!(
                f,
                "        default: printf(\"Error: No {} shader found.\");",
                kind.name()
            )?;
        }
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}

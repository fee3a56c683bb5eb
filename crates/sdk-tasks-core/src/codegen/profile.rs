//! Variant profiles: the recipe for one generated client
//!
//! Two variants are derived from the canonical client:
//!
//! - **async**: methods become coroutines, api calls are awaited and the client
//!   is wired to the async base client and response type
//! - **legacy**: return types widen to `Union[Future, <response>]` and the client
//!   is wired to the legacy base client; call sites are left untouched

use super::rule::{RewriteRule, Target};
use std::fmt;
use std::path::{Path, PathBuf};

/// Module and type of the deferred-completion placeholder
const DEFERRED_MODULE: &str = "asyncio";
const DEFERRED_TYPE: &str = "Future";

const BANNER_RULE_WIDTH: usize = 54;

/// The derived client flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    Async,
    Legacy,
}

impl VariantKind {
    pub fn name(&self) -> &'static str {
        match self {
            VariantKind::Async => "async",
            VariantKind::Legacy => "legacy",
        }
    }

    /// Prefix applied to class names (`WebClient` -> `AsyncWebClient`)
    pub fn class_prefix(&self) -> &'static str {
        match self {
            VariantKind::Async => "Async",
            VariantKind::Legacy => "Legacy",
        }
    }

    pub fn variant_name(&self, canonical: &str) -> String {
        format!("{}{}", self.class_prefix(), canonical)
    }

    /// Inverse of [`VariantKind::variant_name`]
    pub fn canonical_name<'a>(&self, variant: &'a str) -> Option<&'a str> {
        variant
            .strip_prefix(self.class_prefix())
            .filter(|rest| !rest.is_empty())
    }

    /// Prefix applied to module names (`base_client` -> `async_base_client`)
    pub fn module_name(&self, canonical: &str) -> String {
        format!("{}_{}", self.name(), canonical)
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names that describe the canonical client
#[derive(Debug, Clone)]
pub struct ClientShape {
    /// Top-level package the client is importable from (e.g. `slack_sdk`)
    pub package: String,
    /// Canonical source path relative to the project root
    pub canonical_path: PathBuf,
    pub class_name: String,
    pub base_class: String,
    pub response_type: String,
    /// Sibling module holding the base client (e.g. `base_client`)
    pub base_module: String,
}

impl ClientShape {
    /// Output path of a variant, next to the canonical source
    pub fn output_path(&self, kind: VariantKind) -> PathBuf {
        let file_name = self
            .canonical_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.canonical_path
            .with_file_name(kind.module_name(&file_name))
    }

    /// Dotted module path of a variant (`slack_sdk.web.async_client`)
    pub fn module_path(&self, kind: VariantKind) -> String {
        module_path_of(&self.output_path(kind))
    }

    fn base_import(&self) -> String {
        format!(
            "from .{} import {}, {}",
            self.base_module, self.base_class, self.response_type
        )
    }

    fn class_header(&self, class: &str, base: &str) -> String {
        format!("class {}({}):", class, base)
    }

    fn package_import(&self) -> String {
        format!("from {} import {}", self.package, self.class_name)
    }

    fn instantiation(&self, class: &str) -> String {
        format!("= {}(", class)
    }
}

fn module_path_of(path: &Path) -> String {
    path.with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".")
}

/// Non-removable header of every generated file
pub fn banner(canonical_path: &Path, regenerate_command: &str) -> String {
    let rule = "!".repeat(BANNER_RULE_WIDTH);
    format!(
        "# {rule}\n\
         #\n\
         #  *** DO NOT EDIT THIS FILE ***\n\
         #\n\
         #  1) Modify {}\n\
         #  2) Run `{}`\n\
         #\n\
         # {rule}\n\
         \n",
        canonical_path.display(),
        regenerate_command,
    )
}

/// Recipe for one generated artifact
#[derive(Debug, Clone)]
pub struct VariantProfile {
    pub kind: VariantKind,
    pub header_banner: String,
    /// Lines inserted between the banner and the rewritten source
    pub prelude: String,
    /// Applied strictly in order; a rule's ordinal is its 1-based position
    pub rules: Vec<RewriteRule>,
    /// Relative to the project root
    pub output_path: PathBuf,
}

impl VariantProfile {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Profile for the coroutine-based client
pub fn async_profile(shape: &ClientShape, header_banner: String) -> VariantProfile {
    let kind = VariantKind::Async;
    let class = kind.variant_name(&shape.class_name);
    let base = kind.variant_name(&shape.base_class);
    let response = kind.variant_name(&shape.response_type);

    let rules = vec![
        RewriteRule::required(Target::Signature, "def ", "async def ").leading(),
        RewriteRule::optional(Target::Import, deferred_import(), ""),
        RewriteRule::required(
            Target::ApiCallReturn,
            "return self.api_call(",
            "return await self.api_call(",
        ),
        RewriteRule::required(
            Target::Signature,
            format!("-> {}", shape.response_type),
            format!("-> {}", response),
        ),
        RewriteRule::required(
            Target::Import,
            shape.base_import(),
            format!(
                "from .{} import {}, {}",
                kind.module_name(&shape.base_module),
                base,
                response
            ),
        ),
        RewriteRule::required(
            Target::ClassHeader,
            shape.class_header(&shape.class_name, &shape.base_class),
            shape.class_header(&class, &base),
        ),
        RewriteRule::optional(
            Target::Text,
            shape.package_import(),
            format!("from {} import {}", shape.module_path(kind), class),
        ),
        RewriteRule::optional(
            Target::Text,
            shape.instantiation(&shape.class_name),
            shape.instantiation(&class),
        ),
    ];

    VariantProfile {
        kind,
        header_banner,
        prelude: String::new(),
        rules,
        output_path: shape.output_path(kind),
    }
}

/// Profile for the client whose calls may hand back a `Future`
pub fn legacy_profile(shape: &ClientShape, header_banner: String) -> VariantProfile {
    let kind = VariantKind::Legacy;
    let class = kind.variant_name(&shape.class_name);
    let base = kind.variant_name(&shape.base_class);

    let rules = vec![
        RewriteRule::required(
            Target::Signature,
            format!("-> {}", shape.response_type),
            format!("-> Union[{}, {}]", DEFERRED_TYPE, shape.response_type),
        ),
        RewriteRule::required(
            Target::Import,
            shape.base_import(),
            format!(
                "from .{} import {}, {}",
                kind.module_name(&shape.base_module),
                base,
                shape.response_type
            ),
        ),
        RewriteRule::required(
            Target::ClassHeader,
            shape.class_header(&shape.class_name, &shape.base_class),
            shape.class_header(&class, &base),
        ),
        RewriteRule::optional(
            Target::Text,
            shape.package_import(),
            format!("from {} import {}", shape.module_path(kind), class),
        ),
        RewriteRule::optional(
            Target::Text,
            shape.instantiation(&shape.class_name),
            shape.instantiation(&class),
        ),
        // The prelude already imports the placeholder
        RewriteRule::optional(Target::Import, deferred_import(), ""),
    ];

    VariantProfile {
        kind,
        header_banner,
        prelude: deferred_import(),
        rules,
        output_path: shape.output_path(kind),
    }
}

fn deferred_import() -> String {
    format!("from {} import {}\n", DEFERRED_MODULE, DEFERRED_TYPE)
}

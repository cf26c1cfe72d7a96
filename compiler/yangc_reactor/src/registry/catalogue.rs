//! Core statement catalogue.
//!
//! Header and linkage statements live in the `init` bundle, definitions in
//! the `statement-definition` bundle and everything else in the
//! `full-declaration` bundle. Statements whose admissible substatements
//! differ between language revisions are registered once per revision.

use yangc_ir::{QName, QNameInterner, YangVersion};

use super::{
    ArgumentKind, Behavior, Cardinality, DefinitionKind, RegistryBuilder, StatementSupport,
    SupportFlags,
};
use crate::Phase;

/// Namespace URI of the `openconfig-extensions` module.
pub const OPENCONFIG_NAMESPACE: &str = "http://openconfig.net/yang/openconfig-ext";

/// Name of the `openconfig-extensions` module.
pub const OPENCONFIG_MODULE: &str = "openconfig-extensions";

/// Extension carrying a module's semantic version.
pub const OPENCONFIG_VERSION: &str = "openconfig-version";

/// Built-in type names.
pub const BUILTIN_TYPES: &[&str] = &[
    "binary",
    "bits",
    "boolean",
    "decimal64",
    "empty",
    "enumeration",
    "identityref",
    "instance-identifier",
    "int8",
    "int16",
    "int32",
    "int64",
    "leafref",
    "string",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "union",
];

/// Check if `name` is a built-in type.
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

use Cardinality as C;

const OPT: Cardinality = C::OPTIONAL;
const ONE: Cardinality = C::MANDATORY;
const ANY: Cardinality = C::ANY;

/// Singleton properties a `refine` or `deviate` replaces rather than adds.
pub const SINGLETON_PROPERTIES: &[&str] = &[
    "config",
    "default",
    "description",
    "mandatory",
    "max-elements",
    "min-elements",
    "presence",
    "reference",
    "type",
    "units",
];

const DOCUMENTED: &[(&str, Cardinality)] = &[("description", OPT), ("reference", OPT)];

const STATUS_DOCUMENTED: &[(&str, Cardinality)] = &[
    ("status", OPT),
    ("description", OPT),
    ("reference", OPT),
];

const HEADER: &[(&str, Cardinality)] = &[
    ("yang-version", OPT),
    ("import", ANY),
    ("include", ANY),
    ("organization", OPT),
    ("contact", OPT),
    ("description", OPT),
    ("reference", OPT),
    ("revision", ANY),
    ("extension", ANY),
    ("feature", ANY),
    ("identity", ANY),
    ("typedef", ANY),
    ("grouping", ANY),
    ("augment", ANY),
    ("deviation", ANY),
    ("rpc", ANY),
    ("notification", ANY),
];

const DATA_DEF_V1: &[&str] = &[
    "container",
    "leaf",
    "leaf-list",
    "list",
    "choice",
    "anyxml",
    "uses",
];

/// Data-definition statements of a language revision.
pub fn data_definitions(version: YangVersion) -> Vec<&'static str> {
    let mut defs = DATA_DEF_V1.to_vec();
    if version == YangVersion::V1_1 {
        defs.push("anydata");
    }
    defs
}

struct Catalogue<'a> {
    interner: &'a QNameInterner,
    builder: &'a mut RegistryBuilder,
}

impl Catalogue<'_> {
    fn kw(&self, name: &str) -> QName {
        self.interner.yang_keyword(name)
    }

    fn support(
        &self,
        name: &str,
        argument: ArgumentKind,
        behavior: Behavior,
        rules: &[(&str, Cardinality)],
    ) -> StatementSupport {
        StatementSupport::new(self.kw(name), argument, behavior)
            .with_substatements(rules.iter().map(|(k, c)| (self.kw(k), *c)))
    }

    fn plain(&mut self, phase: Phase, name: &str, argument: ArgumentKind, rules: &[(&str, Cardinality)]) {
        let support = self.support(name, argument, Behavior::Plain, rules);
        self.builder.add_support(phase, support);
    }

    fn common(&mut self, phase: Phase, support: StatementSupport) {
        self.builder.add_support(phase, support);
    }

    fn versioned(&mut self, phase: Phase, make: impl Fn(&Self, YangVersion) -> StatementSupport) {
        for version in YangVersion::ALL {
            let support = make(self, version);
            self.builder.add_versioned_support(phase, version, support);
        }
    }
}

/// Rules for the body of a schema-tree container in `version`.
fn body(version: YangVersion, extra: &[(&'static str, Cardinality)]) -> Vec<(&'static str, Cardinality)> {
    let mut rules: Vec<(&'static str, Cardinality)> =
        data_definitions(version).into_iter().map(|k| (k, ANY)).collect();
    rules.extend_from_slice(extra);
    rules
}

fn with_v1_1(
    version: YangVersion,
    mut rules: Vec<(&'static str, Cardinality)>,
    additions: &[(&'static str, Cardinality)],
) -> Vec<(&'static str, Cardinality)> {
    if version == YangVersion::V1_1 {
        rules.extend_from_slice(additions);
    }
    rules
}

const SCHEMA_CONTAINER_EXTRA: &[(&str, Cardinality)] = &[
    ("when", OPT),
    ("if-feature", ANY),
    ("must", ANY),
    ("config", OPT),
    ("status", OPT),
    ("description", OPT),
    ("reference", OPT),
    ("typedef", ANY),
    ("grouping", ANY),
];

const ACTIONS_AND_NOTIFICATIONS: &[(&str, Cardinality)] = &[("action", ANY), ("notification", ANY)];

const ANY_DATA: &[(&str, Cardinality)] = &[
    ("when", OPT),
    ("if-feature", ANY),
    ("must", ANY),
    ("config", OPT),
    ("mandatory", OPT),
    ("status", OPT),
    ("description", OPT),
    ("reference", OPT),
];

const OPERATION: &[(&str, Cardinality)] = &[
    ("if-feature", ANY),
    ("status", OPT),
    ("description", OPT),
    ("reference", OPT),
    ("typedef", ANY),
    ("grouping", ANY),
    ("input", OPT),
    ("output", OPT),
];

const RESTRICTION: &[(&str, Cardinality)] = &[
    ("error-message", OPT),
    ("error-app-tag", OPT),
    ("description", OPT),
    ("reference", OPT),
];

/// Register the core statements.
pub(super) fn register_core(builder: &mut RegistryBuilder) {
    let interner = builder.interner().clone();
    let mut cat = Catalogue {
        interner: &interner,
        builder,
    };
    register_header(&mut cat);
    register_definitions(&mut cat);
    register_schema_tree(&mut cat);
    register_properties(&mut cat);
    register_types(&mut cat);
    register_extensions(&mut cat);
}

fn register_header(cat: &mut Catalogue<'_>) {
    use ArgumentKind as A;
    let init = Phase::Init;

    cat.versioned(init, |cat, version| {
        let mut rules = body(version, HEADER);
        rules.push(("namespace", ONE));
        rules.push(("prefix", ONE));
        cat.support("module", A::Identifier, Behavior::Module, &rules)
    });
    cat.versioned(init, |cat, version| {
        let mut rules = body(version, HEADER);
        rules.push(("belongs-to", ONE));
        cat.support("submodule", A::Identifier, Behavior::Submodule, &rules)
    });

    cat.plain(init, "yang-version", A::YangVersion, &[]);
    cat.plain(init, "namespace", A::Text, &[]);
    cat.plain(init, "prefix", A::Identifier, &[]);
    let import = cat.support(
        "import",
        A::Identifier,
        Behavior::Import,
        &[
            ("prefix", ONE),
            ("revision-date", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    );
    cat.common(init, import);
    let include = cat.support(
        "include",
        A::Identifier,
        Behavior::Include,
        &[("revision-date", OPT), ("description", OPT), ("reference", OPT)],
    );
    cat.common(init, include);
    let belongs_to = cat.support("belongs-to", A::Identifier, Behavior::BelongsTo, &[("prefix", ONE)]);
    cat.common(init, belongs_to);
    cat.plain(init, "revision", A::RevisionDate, DOCUMENTED);
    cat.plain(init, "revision-date", A::RevisionDate, &[]);
    for text in ["organization", "contact", "description", "reference"] {
        cat.plain(init, text, A::Text, &[]);
    }
}

fn register_definitions(cat: &mut Catalogue<'_>) {
    use ArgumentKind as A;
    let def = Phase::StatementDefinition;

    cat.versioned(def, |cat, version| {
        let rules = body(
            version,
            &[
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
                ("typedef", ANY),
                ("grouping", ANY),
            ],
        );
        let rules = with_v1_1(version, rules, ACTIONS_AND_NOTIFICATIONS);
        cat.support(
            "grouping",
            A::Identifier,
            Behavior::Definition(DefinitionKind::Grouping),
            &rules,
        )
        .with_flags(SupportFlags::CONSUMED)
    });

    let typedef = cat.support(
        "typedef",
        A::Identifier,
        Behavior::Definition(DefinitionKind::Typedef),
        &[
            ("type", ONE),
            ("units", OPT),
            ("default", OPT),
            ("status", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    );
    cat.common(def, typedef);

    cat.versioned(def, |cat, version| {
        let base = if version == YangVersion::V1 { OPT } else { ANY };
        let rules = with_v1_1(
            version,
            vec![("base", base), ("status", OPT), ("description", OPT), ("reference", OPT)],
            &[("if-feature", ANY)],
        );
        cat.support(
            "identity",
            A::Identifier,
            Behavior::Definition(DefinitionKind::Identity),
            &rules,
        )
    });

    let feature = cat.support(
        "feature",
        A::Identifier,
        Behavior::Definition(DefinitionKind::Feature),
        &[
            ("if-feature", ANY),
            ("status", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    );
    cat.common(def, feature);

    let extension = cat.support(
        "extension",
        A::Identifier,
        Behavior::Definition(DefinitionKind::Extension),
        &[
            ("argument", OPT),
            ("status", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    );
    cat.common(def, extension);
    cat.plain(def, "argument", A::Identifier, &[("yin-element", OPT)]);
    cat.plain(def, "yin-element", A::Boolean, &[]);
}

fn register_schema_tree(cat: &mut Catalogue<'_>) {
    use ArgumentKind as A;
    let full = Phase::FullDeclaration;
    let holder = SupportFlags::SCHEMA_NODE | SupportFlags::DATA_HOLDER;

    cat.versioned(full, |cat, version| {
        let rules = body(version, SCHEMA_CONTAINER_EXTRA);
        let mut rules = with_v1_1(version, rules, ACTIONS_AND_NOTIFICATIONS);
        rules.push(("presence", OPT));
        cat.support("container", A::Identifier, Behavior::Plain, &rules)
            .with_flags(holder)
    });

    cat.versioned(full, |cat, version| {
        let rules = body(version, SCHEMA_CONTAINER_EXTRA);
        let mut rules = with_v1_1(version, rules, ACTIONS_AND_NOTIFICATIONS);
        rules.extend_from_slice(&[
            ("key", OPT),
            ("unique", ANY),
            ("min-elements", OPT),
            ("max-elements", OPT),
            ("ordered-by", OPT),
        ]);
        cat.support("list", A::Identifier, Behavior::Plain, &rules)
            .with_flags(holder)
    });

    let leaf = cat.support(
        "leaf",
        A::Identifier,
        Behavior::Plain,
        &[
            ("when", OPT),
            ("if-feature", ANY),
            ("type", ONE),
            ("units", OPT),
            ("must", ANY),
            ("default", OPT),
            ("config", OPT),
            ("mandatory", OPT),
            ("status", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    )
    .with_flags(SupportFlags::SCHEMA_NODE);
    cat.common(full, leaf);

    cat.versioned(full, |cat, version| {
        let rules = with_v1_1(
            version,
            vec![
                ("when", OPT),
                ("if-feature", ANY),
                ("type", ONE),
                ("units", OPT),
                ("must", ANY),
                ("config", OPT),
                ("min-elements", OPT),
                ("max-elements", OPT),
                ("ordered-by", OPT),
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
            ],
            &[("default", ANY)],
        );
        cat.support("leaf-list", A::Identifier, Behavior::Plain, &rules)
            .with_flags(SupportFlags::SCHEMA_NODE)
    });

    cat.versioned(full, |cat, version| {
        let mut short_cases = vec![
            ("container", ANY),
            ("leaf", ANY),
            ("leaf-list", ANY),
            ("list", ANY),
            ("anyxml", ANY),
        ];
        if version == YangVersion::V1_1 {
            short_cases.extend_from_slice(&[("anydata", ANY), ("choice", ANY)]);
        }
        short_cases.extend_from_slice(&[
            ("case", ANY),
            ("when", OPT),
            ("if-feature", ANY),
            ("default", OPT),
            ("config", OPT),
            ("mandatory", OPT),
            ("status", OPT),
            ("description", OPT),
            ("reference", OPT),
        ]);
        cat.support("choice", A::Identifier, Behavior::Plain, &short_cases)
            .with_flags(holder)
    });

    cat.versioned(full, |cat, version| {
        let rules = body(
            version,
            &[
                ("when", OPT),
                ("if-feature", ANY),
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
            ],
        );
        cat.support("case", A::Identifier, Behavior::Plain, &rules)
            .with_flags(holder)
    });

    let anyxml = cat
        .support("anyxml", A::Identifier, Behavior::Plain, ANY_DATA)
        .with_flags(SupportFlags::SCHEMA_NODE);
    cat.common(full, anyxml);
    let anydata = cat
        .support("anydata", A::Identifier, Behavior::Plain, ANY_DATA)
        .with_flags(SupportFlags::SCHEMA_NODE);
    cat.builder
        .add_versioned_support(full, YangVersion::V1_1, anydata);

    let uses = cat
        .support(
            "uses",
            A::NodeIdentifier,
            Behavior::Uses,
            &[
                ("when", OPT),
                ("if-feature", ANY),
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
                ("refine", ANY),
                ("augment", ANY),
            ],
        )
        .with_flags(SupportFlags::CONSUMED);
    cat.common(full, uses);

    let refine = cat
        .support(
            "refine",
            A::DescendantSchemaNodeId,
            Behavior::Refine,
            &[
                ("if-feature", ANY),
                ("must", ANY),
                ("presence", OPT),
                ("default", ANY),
                ("config", OPT),
                ("mandatory", OPT),
                ("min-elements", OPT),
                ("max-elements", OPT),
                ("description", OPT),
                ("reference", OPT),
            ],
        )
        .with_flags(SupportFlags::CONSUMED);
    cat.common(full, refine);

    cat.versioned(full, |cat, version| {
        let rules = body(
            version,
            &[
                ("when", OPT),
                ("if-feature", ANY),
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
                ("case", ANY),
            ],
        );
        let rules = with_v1_1(version, rules, ACTIONS_AND_NOTIFICATIONS);
        cat.support("augment", A::SchemaNodeId, Behavior::Augment, &rules)
            .with_flags(SupportFlags::CONSUMED)
    });

    let rpc = cat
        .support("rpc", A::Identifier, Behavior::Plain, OPERATION)
        .with_flags(SupportFlags::SCHEMA_NODE);
    cat.common(full, rpc);
    let action = cat
        .support("action", A::Identifier, Behavior::Plain, OPERATION)
        .with_flags(SupportFlags::SCHEMA_NODE);
    cat.builder
        .add_versioned_support(full, YangVersion::V1_1, action);

    for keyword in ["input", "output"] {
        cat.versioned(full, |cat, version| {
            let rules = body(version, &[("typedef", ANY), ("grouping", ANY)]);
            let rules = with_v1_1(version, rules, &[("must", ANY)]);
            cat.support(keyword, A::None, Behavior::Plain, &rules)
                .with_flags(holder)
        });
    }

    cat.versioned(full, |cat, version| {
        let rules = body(
            version,
            &[
                ("if-feature", ANY),
                ("status", OPT),
                ("description", OPT),
                ("reference", OPT),
                ("typedef", ANY),
                ("grouping", ANY),
            ],
        );
        let rules = with_v1_1(version, rules, &[("must", ANY)]);
        cat.support("notification", A::Identifier, Behavior::Plain, &rules)
            .with_flags(holder)
    });

    let deviation = cat
        .support(
            "deviation",
            A::AbsoluteSchemaNodeId,
            Behavior::Deviation,
            &[
                ("description", OPT),
                ("reference", OPT),
                ("deviate", C::AT_LEAST_ONE),
            ],
        )
        .with_flags(SupportFlags::CONSUMED);
    cat.common(full, deviation);

    let deviate = cat
        .support(
            "deviate",
            A::Deviate,
            Behavior::Deviate,
            &[
                ("units", OPT),
                ("must", ANY),
                ("unique", ANY),
                ("default", ANY),
                ("config", OPT),
                ("mandatory", OPT),
                ("min-elements", OPT),
                ("max-elements", OPT),
                ("type", OPT),
            ],
        )
        .with_flags(SupportFlags::CONSUMED);
    cat.common(full, deviate);
}

fn register_properties(cat: &mut Catalogue<'_>) {
    use ArgumentKind as A;
    let full = Phase::FullDeclaration;

    cat.plain(full, "when", A::Text, DOCUMENTED);
    cat.plain(
        full,
        "must",
        A::Text,
        &[
            ("error-message", OPT),
            ("error-app-tag", OPT),
            ("description", OPT),
            ("reference", OPT),
        ],
    );
    for boolean in ["config", "mandatory", "require-instance"] {
        cat.plain(full, boolean, A::Boolean, &[]);
    }
    for text in [
        "presence",
        "units",
        "default",
        "key",
        "unique",
        "ordered-by",
        "status",
        "error-message",
        "error-app-tag",
        "path",
        "value",
    ] {
        cat.plain(full, text, A::Text, &[]);
    }
    cat.plain(full, "min-elements", A::NonNegativeInteger, &[]);
    cat.plain(full, "max-elements", A::MaxValue, &[]);
    cat.plain(full, "position", A::NonNegativeInteger, &[]);
    cat.plain(full, "fraction-digits", A::NonNegativeInteger, &[]);

    let if_feature = cat.support("if-feature", A::IfFeatureExpr, Behavior::IfFeature, &[]);
    cat.common(full, if_feature);
    let base = cat.support("base", A::NodeIdentifier, Behavior::Base, &[]);
    cat.common(full, base);
}

fn register_types(cat: &mut Catalogue<'_>) {
    use ArgumentKind as A;
    let full = Phase::FullDeclaration;

    let ty = cat.support(
        "type",
        A::NodeIdentifier,
        Behavior::Type,
        &[
            ("fraction-digits", OPT),
            ("range", OPT),
            ("length", OPT),
            ("pattern", ANY),
            ("enum", ANY),
            ("bit", ANY),
            ("path", OPT),
            ("require-instance", OPT),
            ("base", ANY),
            ("type", ANY),
        ],
    );
    cat.common(full, ty);
    cat.plain(full, "range", A::Text, RESTRICTION);
    cat.plain(full, "length", A::Text, RESTRICTION);
    cat.versioned(full, |cat, version| {
        let rules = with_v1_1(version, RESTRICTION.to_vec(), &[("modifier", OPT)]);
        cat.support("pattern", A::Text, Behavior::Plain, &rules)
    });
    let modifier = cat.support("modifier", A::Text, Behavior::Plain, &[]);
    cat.builder
        .add_versioned_support(full, YangVersion::V1_1, modifier);

    cat.versioned(full, |cat, version| {
        let mut rules = with_v1_1(version, vec![("value", OPT)], &[("if-feature", ANY)]);
        rules.extend_from_slice(STATUS_DOCUMENTED);
        cat.support("enum", A::Text, Behavior::Plain, &rules)
    });
    cat.versioned(full, |cat, version| {
        let mut rules = with_v1_1(version, vec![("position", OPT)], &[("if-feature", ANY)]);
        rules.extend_from_slice(STATUS_DOCUMENTED);
        cat.support("bit", A::Identifier, Behavior::Plain, &rules)
    });
}

fn register_extensions(cat: &mut Catalogue<'_>) {
    let module = cat.interner.module_str(OPENCONFIG_NAMESPACE, None);
    let keyword = cat.interner.qname_str(module, OPENCONFIG_VERSION);
    cat.common(
        Phase::FullDeclaration,
        StatementSupport::new(keyword, ArgumentKind::SemVer, Behavior::Plain),
    );
}

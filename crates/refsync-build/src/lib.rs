//! Build-time reference resolution and accessor generation.
//!
//! [`analyze`] turns a class metadata view into per-entity field models and
//! the process-wide tables; [`generate`] additionally synthesizes and emits
//! the accessor code. Either fails as a whole on the first fatal error.

pub mod builder;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod model;
pub mod naming;
pub mod paths;
pub mod replacement;
pub mod resolve;
pub mod synth;
pub mod unwrap;

#[cfg(test)]
mod test_fixtures;

pub use error::BuildError;

use crate::{
    builder::EntityModelBuilder,
    catalog::{CatalogEntry, build_catalog},
    model::EntityModel,
    paths::CratePaths,
    replacement::{PropertyReplacer, ReplacementMap},
    synth::{AccessorSynthesizer, ClassAugmentation, emit::Emitter},
};
use proc_macro2::TokenStream;
use refsync_config::{ConfigError, ResolverConfig};
use refsync_schema::{
    node::ClassIndex,
    validate::{identifier::duplicate_identifiers, validate_index},
};
use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};
use tracing::info;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Analysis, BuildError, Generated, analyze, generate,
        classify::{Classification, EntityClassifier},
        model::{EntityModel, FieldKind, ReferenceHolderField, ReferencedEntityField},
        resolve::ReferenceFieldResolver,
        synth::{AccessorSynthesizer, ClassAugmentation},
        unwrap::TypeUnwrapper,
    };
}

///
/// Analysis
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Analysis {
    pub models: BTreeMap<String, EntityModel>,

    /// Entity classes with publicly accessible fields, for the field-access
    /// rewriting pass.
    pub public_field_classes: BTreeSet<String>,

    /// Classes needing reflection registration.
    pub reflection: BTreeSet<String>,

    pub replacements: ReplacementMap,
    pub catalog: Vec<CatalogEntry>,
}

impl Analysis {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

///
/// Generated
///

#[derive(Clone, Debug)]
pub struct Generated {
    pub analysis: Analysis,
    pub augmentations: Vec<ClassAugmentation>,

    /// Holder field declarations per class, for injection into the class body.
    pub field_decls: BTreeMap<String, TokenStream>,

    /// Accessor impls plus the registry bootstrap function.
    pub tokens: TokenStream,
}

impl Generated {
    #[must_use]
    pub fn source(&self) -> String {
        self.tokens.to_string()
    }
}

/// Validate the metadata view and build every entity model.
pub fn analyze(index: &ClassIndex, config: &ResolverConfig) -> Result<Analysis, BuildError> {
    config.validate()?;

    if let Some((class, field)) = duplicate_identifiers(index, config).first() {
        return Err(BuildError::DuplicateIdentifierAnnotation {
            class: class.path.clone(),
            field: field.ident.clone(),
        });
    }
    validate_index(index, config).map_err(BuildError::Validation)?;

    let builder = EntityModelBuilder::new(index, config);
    let entities = builder.entity_classes();
    let set = builder.build()?;

    let replacements = PropertyReplacer::new(index, config).build(&set.models);
    let catalog = build_catalog(&entities);
    let reflection = entities.iter().map(|class| class.path.clone()).collect();

    info!(
        entities = entities.len(),
        replaced = replacements.len(),
        "analysis complete"
    );

    Ok(Analysis {
        models: set.models,
        public_field_classes: set.public_field_classes,
        reflection,
        replacements,
        catalog,
    })
}

/// Analyze, synthesize and emit. Nothing is returned unless every class
/// succeeds.
pub fn generate(index: &ClassIndex, config: &ResolverConfig) -> Result<Generated, BuildError> {
    let analysis = analyze(index, config)?;
    let paths = CratePaths::new(config)?;
    let emitter = Emitter::new(&paths);
    let synthesizer = AccessorSynthesizer::new(index);

    let augmentations = analysis
        .models
        .values()
        .filter_map(|model| synthesizer.synthesize(model))
        .collect::<Vec<_>>();

    let mut tokens = TokenStream::new();
    let mut field_decls = BTreeMap::new();
    for aug in &augmentations {
        tokens.extend(emitter.augmentation(aug)?);

        let decls = emitter.field_decls(aug)?;
        if !decls.is_empty() {
            field_decls.insert(aug.class.clone(), decls);
        }
    }
    tokens.extend(emitter.bootstrap(&analysis.replacements, &analysis.catalog));

    info!(
        classes = augmentations.len(),
        methods = augmentations.iter().map(|a| a.methods.len()).sum::<usize>(),
        "accessors generated"
    );

    Ok(Generated {
        analysis,
        augmentations,
        field_decls,
        tokens,
    })
}

/// [`generate`] from a JSON class index and an optional TOML config file.
pub fn generate_from_files(
    index_path: &Path,
    config_path: Option<&Path>,
) -> Result<Generated, BuildError> {
    let source = fs::read_to_string(index_path).map_err(|source| ConfigError::Io {
        path: index_path.display().to_string(),
        source,
    })?;
    let index = ClassIndex::from_json(&source)?;
    let config = match config_path {
        Some(path) => ResolverConfig::from_path(path)?,
        None => ResolverConfig::default(),
    };

    generate(&index, &config)
}

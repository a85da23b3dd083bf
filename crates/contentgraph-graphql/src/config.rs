//! GraphQL configuration.
//!
//! Configuration is read from the `[graphql]` section of a TOML document.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! query_type_name = "Query"
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! argument_naming = "bare"
//! entry_arg_candidates = ["slug", "code", "name", "key"]
//! ordering_and_selection = false
//! ```

use contentgraph_model::names::is_valid_graphql_name;
use serde::{Deserialize, Serialize};

use crate::schema::{
    ArgumentOptions, DEFAULT_ENTRY_ARG_CANDIDATES, DEFAULT_QUERY_TYPE_NAME, NamingPolicy,
    SchemaBuilderConfig,
};

/// GraphQL schema configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Name of the root query type.
    /// Default: "Query"
    #[serde(default = "default_query_type_name")]
    pub query_type_name: String,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Naming of the built-in control arguments (`id`, `_id` or `idArg`).
    /// Default: bare
    #[serde(default)]
    pub argument_naming: NamingPolicy,

    /// Field ids that become lookup arguments of the singular field when a
    /// content type declares them.
    /// Default: ["slug", "code", "name", "key"]
    #[serde(default = "default_entry_arg_candidates")]
    pub entry_arg_candidates: Vec<String>,

    /// Adds `select` and `order` arguments to collection fields.
    /// Default: false
    #[serde(default)]
    pub ordering_and_selection: bool,
}

fn default_query_type_name() -> String {
    DEFAULT_QUERY_TYPE_NAME.to_string()
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

fn default_entry_arg_candidates() -> Vec<String> {
    DEFAULT_ENTRY_ARG_CANDIDATES
        .iter()
        .map(|c| (*c).to_string())
        .collect()
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            query_type_name: default_query_type_name(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
            argument_naming: NamingPolicy::default(),
            entry_arg_candidates: default_entry_arg_candidates(),
            ordering_and_selection: false,
        }
    }
}

#[derive(Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    graphql: GraphQLConfig,
}

impl GraphQLConfig {
    /// Reads the `[graphql]` section of a TOML document.
    ///
    /// A missing section yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or has wrong types.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        let document: ConfigDocument = toml::from_str(source)?;
        Ok(document.graphql)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        if !is_valid_graphql_name(&self.query_type_name) {
            return Err(format!(
                "graphql.query_type_name '{}' is not a valid GraphQL name",
                self.query_type_name
            ));
        }
        if let Some(bad) = self
            .entry_arg_candidates
            .iter()
            .find(|c| !is_valid_graphql_name(c))
        {
            return Err(format!(
                "graphql.entry_arg_candidates contains invalid name '{bad}'"
            ));
        }
        Ok(())
    }

    /// Converts this config to a SchemaBuilderConfig.
    #[must_use]
    pub fn to_schema_builder_config(&self) -> SchemaBuilderConfig {
        SchemaBuilderConfig {
            query_type_name: self.query_type_name.clone(),
            max_depth: self.max_depth,
            max_complexity: self.max_complexity,
            introspection_enabled: self.introspection,
            arguments: ArgumentOptions {
                naming: self.argument_naming,
                entry_arg_candidates: self.entry_arg_candidates.clone(),
                ordering_and_selection: self.ordering_and_selection,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphQLConfig::default();
        assert_eq!(config.query_type_name, "Query");
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
        assert_eq!(config.argument_naming, NamingPolicy::Bare);
        assert_eq!(config.entry_arg_candidates, vec!["slug", "code", "name", "key"]);
        assert!(!config.ordering_and_selection);
    }

    #[test]
    fn test_valid_config() {
        let config = GraphQLConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_max_depth() {
        let config = GraphQLConfig {
            max_depth: 0,
            ..GraphQLConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_names() {
        let config = GraphQLConfig {
            query_type_name: "Root Query".into(),
            ..GraphQLConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GraphQLConfig {
            entry_arg_candidates: vec!["slug".into(), "not-valid".into()],
            ..GraphQLConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("not-valid"));
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [graphql]
            query_type_name = "ContentQuery"
            max_depth = 10
            argument_naming = "underscore"
            entry_arg_candidates = ["slug", "sku"]
            ordering_and_selection = true
        "#;

        let config = GraphQLConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.query_type_name, "ContentQuery");
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.max_complexity, 500); // default
        assert_eq!(config.argument_naming, NamingPolicy::Underscore);
        assert_eq!(config.entry_arg_candidates, vec!["slug", "sku"]);
        assert!(config.ordering_and_selection);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = GraphQLConfig::from_toml_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config, GraphQLConfig::default());
    }

    #[test]
    fn test_unknown_naming_policy_is_rejected() {
        let result = GraphQLConfig::from_toml_str("[graphql]\nargument_naming = \"kebab\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_to_schema_builder_config() {
        let config = GraphQLConfig {
            introspection: false,
            argument_naming: NamingPolicy::Suffixed,
            ..GraphQLConfig::default()
        };
        let builder_config = config.to_schema_builder_config();
        assert!(!builder_config.introspection_enabled);
        assert_eq!(builder_config.arguments.naming, NamingPolicy::Suffixed);
        assert_eq!(builder_config.query_type_name, "Query");
    }
}

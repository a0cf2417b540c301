//! Version 1 of the configuration format.

use std::path::{Component, Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_metadata::metadata::{HolderInfo, StaticParameters};

use crate::environment::Variable;
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};
use crate::values::{ConnectionUri, PoolSettings, Secret};

pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";
pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "SQL_GRID_CONNECTION_URI";

/// Initial configuration, just enough to connect to a database and elaborate a full
/// 'Configuration'.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Version of the configuration format. Only `1` is supported.
    pub version: u32,
    /// The hand-written query, containing `{{WHERE}}`, `{{ORDER}}` and `{{PAGING}}` once each.
    pub template: TemplateSource,
    /// Values bound to parameters the template refers to as `:name`.
    #[serde(default)]
    pub parameters: StaticParameters,
    /// The fields of the rows the template returns.
    pub holder: HolderInfo,
    pub connection_uri: ConnectionUri,
    #[serde(skip_serializing_if = "PoolSettings::is_default")]
    #[serde(default)]
    pub pool_settings: PoolSettings,
}

impl ParsedConfiguration {
    /// A starting point for a configuration directory.
    pub fn initial() -> Self {
        ParsedConfiguration {
            version: 1,
            template: TemplateSource::Inline(
                "SELECT id, name FROM people WHERE 1=1 {{WHERE}} ORDER BY 1=1{{ORDER}} {{PAGING}}"
                    .to_string(),
            ),
            parameters: StaticParameters::empty(),
            holder: HolderInfo::new("Person", ["id", "name"]),
            connection_uri: ConnectionUri(Secret::FromEnvironment {
                variable: Variable::from(DEFAULT_CONNECTION_URI_VARIABLE),
            }),
            pool_settings: PoolSettings::default(),
        }
    }
}

/// Where the query template text lives.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(from = "TemplateSourceExternal", into = "TemplateSourceExternal")]
pub enum TemplateSource {
    /// The template is written inline.
    Inline(String),
    /// The template lives in a file which has not been read yet.
    File { file: PathBuf },
    /// The template was read from a file by 'parse_configuration'.
    FromFile { file: PathBuf, sql: String },
}

impl TemplateSource {
    /// The template text, if it is available without touching the disk.
    pub fn sql(&self) -> Option<&str> {
        match self {
            TemplateSource::Inline(sql) | TemplateSource::FromFile { sql, .. } => Some(sql),
            TemplateSource::File { .. } => None,
        }
    }

    /// Read the template file, if any, relative to the configuration directory.
    async fn read_external(
        self,
        configuration_dir: &Path,
    ) -> Result<TemplateSource, ParseConfigurationError> {
        match self {
            TemplateSource::File { file } => {
                let path = configuration_dir.join(&file);
                let sql = fs::read_to_string(&path).await.map_err(|err| {
                    ParseConfigurationError::IoErrorButStringified(format!(
                        "{}: {}",
                        path.display(),
                        err
                    ))
                })?;
                Ok(TemplateSource::FromFile { file, sql })
            }
            other => Ok(other),
        }
    }
}

impl JsonSchema for TemplateSource {
    fn schema_name() -> String {
        "TemplateSource".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        TemplateSourceExternal::json_schema(gen)
    }
}

// We use this type as an intermediate representation for serialization/deserialization
// of the template location.
/// Query template location.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum TemplateSourceExternal {
    /// Inline query template.
    Inline(String),
    /// Refer to an external query template file.
    File {
        /// Relative path to a sql file.
        file: PathBuf,
    },
}

impl From<TemplateSourceExternal> for TemplateSource {
    fn from(value: TemplateSourceExternal) -> Self {
        match value {
            TemplateSourceExternal::Inline(sql) => TemplateSource::Inline(sql),
            TemplateSourceExternal::File { file } => TemplateSource::File { file },
        }
    }
}

impl From<TemplateSource> for TemplateSourceExternal {
    fn from(value: TemplateSource) -> Self {
        match value {
            TemplateSource::Inline(sql) => TemplateSourceExternal::Inline(sql),
            TemplateSource::File { file } | TemplateSource::FromFile { file, .. } => {
                TemplateSourceExternal::File { file }
            }
        }
    }
}

/// Read the configuration file from a directory, along with the template file it refers to.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let mut parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    // look for a template file reference and read it from disk.
    parsed_config.template = parsed_config
        .template
        .read_external(configuration_dir.as_ref())
        .await?;

    tracing::debug!(
        configuration_file = %configuration_file.display(),
        holder = %parsed_config.holder.name,
        "parsed configuration"
    );

    Ok(parsed_config)
}

/// Write the configuration, its template file and its JSON schema to a directory.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    // refuse template paths that leave the output directory, before anything is written.
    if let TemplateSource::FromFile { file, .. } = &parsed_config.template {
        if !stays_inside(file) {
            return Err(WriteParsedConfigurationError::WritingOutsideDestinationDir {
                dir: out_dir.as_ref().to_owned(),
                file: file.clone(),
            });
        }
    }

    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    // write the template next to it, when it came from a file.
    if let TemplateSource::FromFile { file, sql } = &parsed_config.template {
        let template_file = out_dir.as_ref().to_owned().join(file);
        if let Some(template_dir) = template_file.parent() {
            fs::create_dir_all(template_dir).await?;
        };
        fs::write(template_file, sql).await?;
    };

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    Ok(())
}

/// A relative path made only of plain names and `.`.
fn stays_inside(file: &Path) -> bool {
    file.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

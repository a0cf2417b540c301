//! Convert the parsed configuration metadata to internal engine metadata
//! That can be used by the data provider at runtime.

use query_engine_metadata::metadata;

use crate::configuration::Configuration;
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::{ConnectionUri, Secret};
use crate::version1::{ParsedConfiguration, TemplateSource};

/// Convert the parsed configuration into the runtime configuration.
///
/// Secrets are resolved against `environment` and the query template is checked to
/// contain each placeholder exactly once.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    if parsed_config.version != 1 {
        return Err(MakeRuntimeConfigurationError::UnsupportedVersion(
            parsed_config.version,
        ));
    }

    let connection_uri = match parsed_config.connection_uri {
        ConnectionUri(Secret::Plain(uri)) => Ok(uri),
        ConnectionUri(Secret::FromEnvironment { variable }) => {
            environment.read(&variable).map_err(|error| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    message: error.to_string(),
                }
            })
        }
    }?;

    let template = match &parsed_config.template {
        TemplateSource::File { file } => Err(MakeRuntimeConfigurationError::TemplateNotRead {
            file: file.clone(),
        }),
        TemplateSource::Inline(sql) | TemplateSource::FromFile { sql, .. } => {
            metadata::QueryTemplate::parse(sql.as_str()).map_err(Into::into)
        }
    }?;

    Ok(Configuration {
        metadata: metadata::Metadata {
            template,
            parameters: parsed_config.parameters,
            holder: parsed_config.holder,
        },
        pool_settings: parsed_config.pool_settings,
        connection_uri,
    })
}

//! Registry of catalog object types the replicator knows how to move.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// One replicable catalog collection on the environment-manager console.
///
/// Each type maps to a REST collection under a fixed API group. Template
/// kinds keep a server-side version history; profile kinds do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    WorkflowHandlers,
    ConfigContexts,
    ResourceTemplates,
    EnvironmentTemplates,
    ComputeProfiles,
    ServiceProfiles,
}

impl ObjectType {
    pub const ALL: [ObjectType; 6] = [
        ObjectType::WorkflowHandlers,
        ObjectType::ConfigContexts,
        ObjectType::ResourceTemplates,
        ObjectType::EnvironmentTemplates,
        ObjectType::ComputeProfiles,
        ObjectType::ServiceProfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::WorkflowHandlers => "workflowhandlers",
            ObjectType::ConfigContexts => "configcontexts",
            ObjectType::ResourceTemplates => "resourcetemplates",
            ObjectType::EnvironmentTemplates => "environmenttemplates",
            ObjectType::ComputeProfiles => "computeprofiles",
            ObjectType::ServiceProfiles => "serviceprofiles",
        }
    }

    /// API group the type's collection is served under.
    pub fn api_group(&self) -> &'static str {
        match self {
            ObjectType::ComputeProfiles | ObjectType::ServiceProfiles => "paas.envmgmt.io",
            _ => "eaas.envmgmt.io",
        }
    }

    /// Whether the console keeps a version history for this type.
    pub fn versioned(&self) -> bool {
        !matches!(
            self,
            ObjectType::ComputeProfiles | ObjectType::ServiceProfiles
        )
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workflowhandlers" => Ok(ObjectType::WorkflowHandlers),
            "configcontexts" => Ok(ObjectType::ConfigContexts),
            "resourcetemplates" => Ok(ObjectType::ResourceTemplates),
            "environmenttemplates" => Ok(ObjectType::EnvironmentTemplates),
            "computeprofiles" => Ok(ObjectType::ComputeProfiles),
            "serviceprofiles" => Ok(ObjectType::ServiceProfiles),
            other => Err(Error::UnsupportedType(format!(
                "{other} (expected one of: {})",
                Self::valid_names()
            ))),
        }
    }
}

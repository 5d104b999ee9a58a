//! API resource names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A collection exposed by the admin API.
///
/// Each variant maps to one path segment under the API base URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Employees,
    NextOfKin,
    Departments,
    Positions,
    Vehicles,
    Insurance,
    Roadworth,
    Nationalities,
    Countries,
    ContractTypes,
    Brands,
}

impl Resource {
    /// Every resource, in menu order.
    pub const ALL: [Resource; 11] = [
        Resource::Employees,
        Resource::NextOfKin,
        Resource::Departments,
        Resource::Positions,
        Resource::Vehicles,
        Resource::Insurance,
        Resource::Roadworth,
        Resource::Nationalities,
        Resource::Countries,
        Resource::ContractTypes,
        Resource::Brands,
    ];

    /// Returns the path segment for this resource.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Employees => "employees",
            Resource::NextOfKin => "nextofkin",
            Resource::Departments => "departments",
            Resource::Positions => "positions",
            Resource::Vehicles => "vehicles",
            Resource::Insurance => "insurance",
            Resource::Roadworth => "roadworth",
            Resource::Nationalities => "nationalities",
            Resource::Countries => "countries",
            Resource::ContractTypes => "contracttypes",
            Resource::Brands => "brands",
        }
    }

    /// Singular human-readable name, used in notices.
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Employees => "employee",
            Resource::NextOfKin => "next of kin",
            Resource::Departments => "department",
            Resource::Positions => "position",
            Resource::Vehicles => "vehicle",
            Resource::Insurance => "insurance record",
            Resource::Roadworth => "roadworthiness record",
            Resource::Nationalities => "nationality",
            Resource::Countries => "country",
            Resource::ContractTypes => "contract type",
            Resource::Brands => "brand",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = Error;

    /// Parses a path segment, ignoring case, `-` and `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        Resource::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .ok_or_else(|| {
                InvalidInputError::Resource {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths() {
        assert_eq!("employees".parse::<Resource>().unwrap(), Resource::Employees);
        assert_eq!("next-of-kin".parse::<Resource>().unwrap(), Resource::NextOfKin);
        assert_eq!("contract_types".parse::<Resource>().unwrap(), Resource::ContractTypes);
        assert!("payroll".parse::<Resource>().is_err());
    }

    #[test]
    fn every_resource_roundtrips_through_its_path() {
        for resource in Resource::ALL {
            assert_eq!(resource.path().parse::<Resource>().unwrap(), resource);
        }
    }
}

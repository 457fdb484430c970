use serde::{Deserialize, Serialize};

/// Application role of the signed-in user
///
/// - Teknisi: technician, executes patch jobs and maintains CMDB assets
/// - Kasi: section head, approves every change type
/// - Kabid: division head, approves standard and major changes
/// - Diskominfo: informatics office, owns patch jobs and major approvals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teknisi,
    Kasi,
    Kabid,
    Diskominfo,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Teknisi, Role::Kasi, Role::Kabid, Role::Diskominfo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teknisi => "teknisi",
            Role::Kasi => "kasi",
            Role::Kabid => "kabid",
            Role::Diskominfo => "diskominfo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "teknisi" => Some(Role::Teknisi),
            "kasi" => Some(Role::Kasi),
            "kabid" => Some(Role::Kabid),
            "diskominfo" => Some(Role::Diskominfo),
            _ => None,
        }
    }

    /// Resolve the application role at login.
    ///
    /// The username wins when it is itself a role name; otherwise the API
    /// role is translated, and anything unrecognized becomes a technician.
    pub fn from_login(username: &str, api_role: &str) -> Self {
        if let Some(role) = Self::from_str(username) {
            return role;
        }
        match api_role.trim().to_uppercase().as_str() {
            "ADMIN" => Role::Diskominfo,
            "TECHNICIAN" => Role::Teknisi,
            "KASI" => Role::Kasi,
            "KABID" => Role::Kabid,
            "DISKOMINFO" => Role::Diskominfo,
            _ => Role::Teknisi,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change request category, stored lowercase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Minor,
    Standard,
    Major,
}

impl ChangeType {
    pub const ALL: [ChangeType; 3] = [ChangeType::Minor, ChangeType::Standard, ChangeType::Major];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Minor => "minor",
            ChangeType::Standard => "standard",
            ChangeType::Major => "major",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Some(ChangeType::Minor),
            "standard" => Some(ChangeType::Standard),
            "major" => Some(ChangeType::Major),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("KASI"), Some(Role::Kasi));
        assert_eq!(Role::from_str("admin"), None);
    }

    #[test]
    fn test_login_mapping_prefers_username() {
        assert_eq!(Role::from_login("kasi", "ADMIN"), Role::Kasi);
        assert_eq!(Role::from_login("Kabid", "TECHNICIAN"), Role::Kabid);
    }

    #[test]
    fn test_login_mapping_falls_back_to_api_role() {
        assert_eq!(Role::from_login("budi", "ADMIN"), Role::Diskominfo);
        assert_eq!(Role::from_login("budi", "technician"), Role::Teknisi);
        assert_eq!(Role::from_login("budi", "KABID"), Role::Kabid);
        assert_eq!(Role::from_login("budi", "DISKOMINFO"), Role::Diskominfo);
        assert_eq!(Role::from_login("budi", "auditor"), Role::Teknisi);
        assert_eq!(Role::from_login("budi", ""), Role::Teknisi);
    }

    #[test]
    fn test_change_type_conversion() {
        assert_eq!(ChangeType::from_str("Major"), Some(ChangeType::Major));
        assert_eq!(ChangeType::from_str(" minor "), Some(ChangeType::Minor));
        assert_eq!(ChangeType::from_str("emergency"), None);
    }
}

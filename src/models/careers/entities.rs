use serde::{Deserialize, Serialize};

// 学历层次
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CareerLevel {
    Technical,
    Undergraduate,
    Postgraduate,
}

impl<'de> Deserialize<'de> for CareerLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的学历层次: '{s}'. 支持: technical, undergraduate, postgraduate"
            ))
        })
    }
}

impl std::fmt::Display for CareerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareerLevel::Technical => write!(f, "technical"),
            CareerLevel::Undergraduate => write!(f, "undergraduate"),
            CareerLevel::Postgraduate => write!(f, "postgraduate"),
        }
    }
}

impl std::str::FromStr for CareerLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(CareerLevel::Technical),
            "undergraduate" => Ok(CareerLevel::Undergraduate),
            "postgraduate" => Ok(CareerLevel::Postgraduate),
            _ => Err(format!("Invalid career level: {s}")),
        }
    }
}

// 授课方式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CareerModality {
    InPerson,
    Online,
    Hybrid,
}

impl<'de> Deserialize<'de> for CareerModality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的授课方式: '{s}'. 支持: in_person, online, hybrid"
            ))
        })
    }
}

impl std::fmt::Display for CareerModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareerModality::InPerson => write!(f, "in_person"),
            CareerModality::Online => write!(f, "online"),
            CareerModality::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl std::str::FromStr for CareerModality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_person" => Ok(CareerModality::InPerson),
            "online" => Ok(CareerModality::Online),
            "hybrid" => Ok(CareerModality::Hybrid),
            _ => Err(format!("Invalid career modality: {s}")),
        }
    }
}

// 专业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Career {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub level: CareerLevel,
    pub modality: CareerModality,
    pub faculty_id: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_strings() {
        assert_eq!(CareerModality::InPerson.to_string(), "in_person");
        assert_eq!("hybrid".parse::<CareerModality>(), Ok(CareerModality::Hybrid));
        assert_eq!(
            "postgraduate".parse::<CareerLevel>(),
            Ok(CareerLevel::Postgraduate)
        );
        assert!(serde_json::from_str::<CareerLevel>("\"phd\"").is_err());
    }
}

use serde::{Deserialize, Serialize};

// 分页查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// 查询字符串中的可选值
///
/// 与 `#[serde(flatten)]` 一起使用时，urlencoded 的值会以字符串形式缓存，
/// 数字和布尔字段需要从字符串解析。
pub fn deserialize_optional_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    use serde::de::{Error, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    struct OptionalVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for OptionalVisitor<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        type Value = Option<T>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a value or a string containing a value")
        }

        fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(None);
            }
            value.parse().map(Some).map_err(Error::custom)
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }

        fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
            self.visit_str(&value.to_string())
        }
    }

    deserializer.deserialize_any(OptionalVisitor(PhantomData))
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl PaginationQuery {
    /// 规范化页码和页大小（页大小上限 100）
    pub fn normalized(&self) -> (i64, i64) {
        (self.page.max(1), self.size.clamp(1, 100))
    }
}

impl PaginationInfo {
    pub fn new(page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_page_params() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":"25"}"#).unwrap();
        assert_eq!((q.page, q.size), (3, 25));
    }

    #[test]
    fn test_optional_values_from_query_strings() {
        #[derive(Deserialize)]
        struct Params {
            #[serde(flatten)]
            pagination: PaginationQuery,
            #[serde(default, deserialize_with = "deserialize_optional_from_str")]
            subject_id: Option<i64>,
            #[serde(default, deserialize_with = "deserialize_optional_from_str")]
            is_active: Option<bool>,
        }

        let p: Params =
            serde_json::from_str(r#"{"page":"2","subject_id":"7","is_active":"true"}"#).unwrap();
        assert_eq!(p.pagination.page, 2);
        assert_eq!(p.subject_id, Some(7));
        assert_eq!(p.is_active, Some(true));

        let p: Params = serde_json::from_str(r#"{"subject_id":""}"#).unwrap();
        assert_eq!(p.subject_id, None);
        assert_eq!(p.is_active, None);
    }

    #[test]
    fn test_normalized_bounds() {
        let q = PaginationQuery { page: 0, size: 500 };
        assert_eq!(q.normalized(), (1, 100));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationInfo::new(1, 10, 11).total_pages, 2);
    }
}

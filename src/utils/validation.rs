use crate::core::filter::DateRange;
use crate::utils::error::{EtlError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    validate_path(field_name, file)?;

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

/// Both ends must parse as month/day/year and the window must not be inverted.
pub fn validate_date_range(field_name: &str, start: &str, end: &str) -> Result<DateRange> {
    DateRange::parse(start, end).map_err(|e| match e {
        EtlError::DateParseError { value, source } => EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value,
            reason: source.to_string(),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("dataset_url", "https://example.com/rows.csv").is_ok());
        assert!(validate_url("dataset_url", "http://example.com").is_ok());
        assert!(validate_url("dataset_url", "").is_err());
        assert!(validate_url("dataset_url", "invalid-url").is_err());
        assert!(validate_url("dataset_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("top_n", 5, 1).is_ok());
        assert!(validate_positive_number("top_n", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("dataset_file", "citations.csv", &["csv"]).is_ok());
        assert!(validate_file_extension("dataset_file", "citations.txt", &["csv"]).is_err());
        assert!(validate_file_extension("dataset_file", "citations", &["csv"]).is_err());
        assert!(validate_file_extension("dataset_file", "", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range("filter", "1/1/2018", "12/31/2018").is_ok());

        let err = validate_date_range("filter", "2018-01-01", "12/31/2018").unwrap_err();
        assert!(matches!(
            err,
            EtlError::InvalidConfigValueError { ref field, ref value, .. }
                if field == "filter" && value == "2018-01-01"
        ));

        assert!(validate_date_range("filter", "12/31/2018", "1/1/2018").is_err());
    }
}

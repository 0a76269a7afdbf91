use bizdir_core::{ListParams, ListResult, ServiceError, now_rfc3339};
use bizdir_sql::{SQLError, Transaction, Value};

use crate::code::next_code;
use crate::model::{
    Company, CompanyPatch, MAX_CODE_LEN, MAX_COUNTRY_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, NewCompany,
};
use crate::service::CompanyService;

const COMPANY_COLUMNS: &str = "id, client_name, company_name, code, logo_path, phone, email, \
                               country, created_at, updated_at";

const SEQUENCE: &str = "companies";

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    if value.chars().count() > max {
        return Err(ServiceError::Validation(format!(
            "{} is longer than {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    if email.is_empty() {
        return Ok(());
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !valid {
        return Err(ServiceError::Validation(format!("invalid email address: {}", email)));
    }
    Ok(())
}

fn validate_fields(
    client_name: &str,
    company_name: &str,
    phone: &str,
    email: &str,
    country: &str,
) -> Result<(), ServiceError> {
    check_len("clientName", client_name, MAX_NAME_LEN)?;
    check_len("companyName", company_name, MAX_NAME_LEN)?;
    check_len("phone", phone, MAX_PHONE_LEN)?;
    check_len("country", country, MAX_COUNTRY_LEN)?;
    validate_email(email)
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Take the next identity from the `companies` counter. The counter starts
/// above any id already present in the table.
fn allocate_id(tx: &dyn Transaction) -> Result<i64, SQLError> {
    tx.exec(
        "INSERT INTO sequences (name, value) \
         VALUES (?1, (SELECT COALESCE(MAX(id), 0) + 1 FROM companies)) \
         ON CONFLICT(name) DO UPDATE SET value = value + 1",
        &[Value::Text(SEQUENCE.into())],
    )?;
    tx.query("SELECT value FROM sequences WHERE name = ?1", &[Value::Text(SEQUENCE.into())])?
        .first()
        .and_then(|r| r.get_i64("value"))
        .ok_or_else(|| SQLError::Query(format!("sequence {} not found", SEQUENCE)))
}

impl NewCompany {
    fn normalized(mut self) -> Self {
        self.client_name = self.client_name.trim().to_string();
        self.company_name = self.company_name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.email = self.email.trim().to_string();
        self.country = self.country.trim().to_string();
        self.code = self.code.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        self
    }

    /// Form-level check: interactive creation needs both names.
    pub fn require_names(&self) -> Result<(), ServiceError> {
        if self.client_name.trim().is_empty() {
            return Err(ServiceError::Validation("clientName is required".into()));
        }
        if self.company_name.trim().is_empty() {
            return Err(ServiceError::Validation("companyName is required".into()));
        }
        Ok(())
    }
}

impl CompanyService {
    /// Create a company and assign its code.
    ///
    /// Identity allocation, code computation and the insert run in one
    /// exclusive transaction, so concurrent creators never observe each
    /// other's half-written rows or compute the same code. An explicit code
    /// (bulk import) is stored as given; a duplicate fails with `Conflict`.
    pub fn create(&self, input: NewCompany) -> Result<Company, ServiceError> {
        let input = input.normalized();
        validate_fields(
            &input.client_name,
            &input.company_name,
            &input.phone,
            &input.email,
            &input.country,
        )?;
        if let Some(code) = &input.code {
            check_len("code", code, MAX_CODE_LEN)?;
        }

        let now = now_rfc3339();
        let ordering = self.config.code_ordering;
        let mut assigned: Option<(i64, String)> = None;

        self.sql
            .transaction(&mut |tx| {
                let id = allocate_id(tx)?;
                let code = match &input.code {
                    Some(code) => code.clone(),
                    None => {
                        let rows = tx.query("SELECT code FROM companies", &[])?;
                        let codes: Vec<String> = rows.iter().map(|r| r.text("code")).collect();
                        next_code(codes.iter().map(String::as_str), id, ordering)
                    }
                };
                tx.exec(
                    "INSERT INTO companies (id, client_name, company_name, company_name_key, code, \
                     phone, email, country, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                    &[
                        Value::Integer(id),
                        Value::Text(input.client_name.clone()),
                        Value::Text(input.company_name.clone()),
                        Value::Text(name_key(&input.company_name)),
                        Value::Text(code.clone()),
                        Value::Text(input.phone.clone()),
                        Value::Text(input.email.clone()),
                        Value::Text(input.country.clone()),
                        Value::Text(now.clone()),
                    ],
                )?;
                assigned = Some((id, code));
                Ok(())
            })
            .map_err(|e| ServiceError::from_storage(e.to_string()))?;

        let (id, code) = assigned
            .ok_or_else(|| ServiceError::Internal("company insert did not complete".into()))?;
        tracing::info!(id, %code, company = %input.company_name, "company created");
        self.get(id)
    }

    pub fn get(&self, id: i64) -> Result<Company, ServiceError> {
        self.find_one(&format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLUMNS), Value::Integer(id))?
            .ok_or_else(|| ServiceError::NotFound(format!("companies/{}", id)))
    }

    /// Exact code lookup.
    pub fn find_by_code(&self, code: &str) -> Result<Option<Company>, ServiceError> {
        self.find_one(
            &format!("SELECT {} FROM companies WHERE code = ?1", COMPANY_COLUMNS),
            Value::Text(code.trim().to_string()),
        )
    }

    /// Case-insensitive exact company-name lookup. The lowest id wins.
    pub fn find_by_company_name(&self, name: &str) -> Result<Option<Company>, ServiceError> {
        self.find_one(
            &format!(
                "SELECT {} FROM companies WHERE company_name_key = ?1 ORDER BY id LIMIT 1",
                COMPANY_COLUMNS
            ),
            Value::Text(name_key(name)),
        )
    }

    fn find_one(&self, sql: &str, param: Value) -> Result<Option<Company>, ServiceError> {
        let rows = self
            .sql
            .query(sql, &[param])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(rows.first().map(Company::from_row))
    }

    /// Apply a partial update. The code never changes.
    pub fn update(&self, id: i64, patch: CompanyPatch) -> Result<Company, ServiceError> {
        let mut company = self.get(id)?;

        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string());
        if let Some(v) = trimmed(patch.client_name) {
            company.client_name = v;
        }
        if let Some(v) = trimmed(patch.company_name) {
            company.company_name = v;
        }
        if let Some(v) = trimmed(patch.phone) {
            company.phone = v;
        }
        if let Some(v) = trimmed(patch.email) {
            company.email = v;
        }
        if let Some(v) = trimmed(patch.country) {
            company.country = v;
        }
        if let Some(key) = patch.logo_path.filter(|k| !k.is_empty()) {
            company.logo_path = Some(key);
        }

        validate_fields(
            &company.client_name,
            &company.company_name,
            &company.phone,
            &company.email,
            &company.country,
        )?;

        company.updated_at = now_rfc3339();
        self.sql
            .exec(
                "UPDATE companies SET client_name = ?1, company_name = ?2, company_name_key = ?3, \
                 logo_path = ?4, phone = ?5, email = ?6, country = ?7, updated_at = ?8 \
                 WHERE id = ?9",
                &[
                    Value::Text(company.client_name.clone()),
                    Value::Text(company.company_name.clone()),
                    Value::Text(name_key(&company.company_name)),
                    Value::from(company.logo_path.clone()),
                    Value::Text(company.phone.clone()),
                    Value::Text(company.email.clone()),
                    Value::Text(company.country.clone()),
                    Value::Text(company.updated_at.clone()),
                    Value::Integer(id),
                ],
            )
            .map_err(|e| ServiceError::from_storage(e.to_string()))?;

        tracing::debug!(id, code = %company.code, "company updated");
        Ok(company)
    }

    /// Delete a company and its logo.
    pub fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let company = self.get(id)?;
        self.sql
            .exec("DELETE FROM companies WHERE id = ?1", &[Value::Integer(id)])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if let Some(key) = &company.logo_path {
            self.release_logo(key);
        }
        tracing::info!(id, code = %company.code, "company deleted");
        Ok(())
    }

    /// List companies by id. `q` filters case-insensitively on company name,
    /// client name, code, email, country and phone.
    pub fn list(&self, params: &ListParams) -> Result<ListResult<Company>, ServiceError> {
        let Some(q) = params.query() else {
            let total = self
                .sql
                .query("SELECT COUNT(*) AS n FROM companies", &[])
                .map_err(|e| ServiceError::Storage(e.to_string()))?
                .first()
                .and_then(|r| r.get_i64("n"))
                .unwrap_or(0) as usize;
            let rows = self
                .sql
                .query(
                    &format!(
                        "SELECT {} FROM companies ORDER BY id LIMIT ?1 OFFSET ?2",
                        COMPANY_COLUMNS
                    ),
                    &[
                        Value::Integer(params.page_size() as i64),
                        Value::Integer(params.offset as i64),
                    ],
                )
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
            return Ok(ListResult {
                items: rows.iter().map(Company::from_row).collect(),
                total,
            });
        };

        // SQLite's LIKE and lower() only fold ASCII, so filter here.
        let needle = q.to_lowercase();
        let rows = self
            .sql
            .query(&format!("SELECT {} FROM companies ORDER BY id", COMPANY_COLUMNS), &[])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let matched: Vec<Company> = rows
            .iter()
            .map(Company::from_row)
            .filter(|c| c.matches(&needle))
            .collect();
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(params.offset)
            .take(params.page_size())
            .collect();
        Ok(ListResult { items, total })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::code::CodeOrdering;
    use crate::service::CompanyConfig;
    use crate::service::testing::{new_company, test_service, test_service_with};

    #[test]
    fn test_create_assigns_sequential_codes() {
        let (svc, _dir) = test_service();
        let codes: Vec<String> = (0..5)
            .map(|i| svc.create(new_company("Cliente", &format!("Empresa {}", i))).unwrap().code)
            .collect();
        assert_eq!(codes, ["0001", "0002", "0003", "0004", "0005"]);
    }

    #[test]
    fn test_ids_and_timestamps() {
        let (svc, _dir) = test_service();
        let a = svc.create(new_company("A", "Alpha")).unwrap();
        let b = svc.create(new_company("B", "Beta")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.created_at, a.updated_at);
        assert!(a.logo_path.is_none());
    }

    #[test]
    fn test_next_code_follows_numeric_max() {
        let (svc, _dir) = test_service();
        let mut explicit = new_company("X", "Explicit");
        explicit.code = Some("0041".into());
        svc.create(explicit).unwrap();

        let next = svc.create(new_company("Y", "Next")).unwrap();
        assert_eq!(next.code, "0042");
    }

    #[test]
    fn test_legacy_code_falls_back_to_identity() {
        let (svc, _dir) = test_service();
        svc.create(new_company("A", "A")).unwrap();
        let mut legacy = new_company("L", "Legacy");
        legacy.code = Some("ABC".into());
        svc.create(legacy).unwrap();

        let next = svc.create(new_company("N", "New")).unwrap();
        assert_eq!(next.id, 3);
        assert_eq!(next.code, "0003");
    }

    #[test]
    fn test_lexicographic_ordering_is_configurable() {
        let seed = |svc: &CompanyService| {
            for (name, code) in [("Short", "9"), ("Padded", "0010")] {
                let mut c = new_company("X", name);
                c.code = Some(code.into());
                svc.create(c).unwrap();
            }
        };

        let (numeric, _d1) = test_service();
        seed(&numeric);
        assert_eq!(numeric.create(new_company("N", "Next")).unwrap().code, "0011");

        // Byte order picks "9" as the largest and lands on a taken code.
        let (legacy, _d2) = test_service_with(CompanyConfig {
            code_ordering: CodeOrdering::Lexicographic,
        });
        seed(&legacy);
        let err = legacy.create(new_company("N", "Next")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_explicit_code_conflict() {
        let (svc, _dir) = test_service();
        svc.create(new_company("A", "A")).unwrap();
        let mut dup = new_company("B", "B");
        dup.code = Some("0001".into());
        let err = svc.create(dup).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // The failed insert rolled back, so the sequence did not advance.
        let next = svc.create(new_company("C", "C")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_concurrent_creates_get_distinct_codes() {
        let (svc, _dir) = test_service();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || svc.create(new_company("T", &format!("Thread {}", i))).unwrap().code)
            })
            .collect();
        let mut codes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        codes.sort();
        let expected: Vec<String> = (1..=8).map(|n| format!("{:04}", n)).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_validation() {
        let (svc, _dir) = test_service();

        let mut long_phone = new_company("A", "A");
        long_phone.phone = "1234567890123456".into();
        assert!(matches!(svc.create(long_phone), Err(ServiceError::Validation(_))));

        let mut bad_email = new_company("A", "A");
        bad_email.email = "not-an-email".into();
        assert!(matches!(svc.create(bad_email), Err(ServiceError::Validation(_))));

        let long_name = new_company(&"x".repeat(101), "A");
        assert!(matches!(svc.create(long_name), Err(ServiceError::Validation(_))));

        assert!(new_company("", "Empresa").require_names().is_err());
        assert!(new_company("Cliente", " ").require_names().is_err());
        assert!(new_company("Cliente", "Empresa").require_names().is_ok());
    }

    #[test]
    fn test_update_keeps_code() {
        let (svc, _dir) = test_service();
        let created = svc.create(new_company("Old", "Old Corp")).unwrap();

        let updated = svc
            .update(
                created.id,
                CompanyPatch {
                    company_name: Some(" New Corp ".into()),
                    email: Some("info@newcorp.com".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.code, created.code);
        assert_eq!(updated.company_name, "New Corp");
        assert_eq!(updated.client_name, "Old");
        assert_eq!(updated.created_at, created.created_at);

        let found = svc.find_by_company_name("NEW CORP").unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[test]
    fn test_find_by_code_and_name() {
        let (svc, _dir) = test_service();
        svc.create(new_company("Ana", "Compañía Andina")).unwrap();
        let b = svc.create(new_company("Beto", "Beta SA")).unwrap();

        assert_eq!(svc.find_by_code("0002").unwrap().unwrap().id, b.id);
        assert!(svc.find_by_code("0099").unwrap().is_none());
        assert!(svc.find_by_company_name("COMPAÑÍA ANDINA").unwrap().is_some());
        assert!(svc.find_by_company_name("Compañía").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (svc, _dir) = test_service();
        let c = svc.create(new_company("A", "A")).unwrap();
        svc.delete(c.id).unwrap();
        assert!(matches!(svc.get(c.id), Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(c.id), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_list_search_and_pagination() {
        let (svc, _dir) = test_service();
        let mut acme = new_company("Wile", "Acme Corp");
        acme.country = "Chile".into();
        svc.create(acme).unwrap();
        let mut globex = new_company("Hank", "Globex");
        globex.email = "hank@globex.com".into();
        svc.create(globex).unwrap();
        let mut initech = new_company("Bill", "Initech");
        initech.phone = "555-0101".into();
        svc.create(initech).unwrap();

        let all = svc.list(&ListParams::default()).unwrap();
        assert_eq!(all.total, 3);
        let ids: Vec<i64> = all.items.iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 2, 3]);

        let search = |q: &str| {
            svc.list(&ListParams { q: Some(q.into()), ..Default::default() })
                .unwrap()
                .items
                .into_iter()
                .map(|c| c.company_name)
                .collect::<Vec<_>>()
        };
        assert_eq!(search("acme"), ["Acme Corp"]);
        assert_eq!(search("CHILE"), ["Acme Corp"]);
        assert_eq!(search("globex.com"), ["Globex"]);
        assert_eq!(search("0101"), ["Initech"]);
        assert_eq!(search("0002"), ["Globex"]);
        assert_eq!(search("hank"), ["Globex"]);
        assert!(search("zzz").is_empty());

        let page = svc
            .list(&ListParams { limit: 1, offset: 1, q: None })
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].company_name, "Globex");
    }
}

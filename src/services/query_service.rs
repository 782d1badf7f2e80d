// src/services/query_service.rs

use std::cmp::Ordering;

use uuid::Uuid;

use crate::{
    models::{
        crm::{Customer, CustomerQuery, CustomerStatus},
        dashboard::CategoryCount,
        geo::OTHER_ZONE,
        visits::{Visit, VisitQuery, VisitStatus},
    },
    services::location_service::LocationService,
};

/// Valor que desliga um filtro categórico.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerSort {
    NameAsc,
    NameDesc,
    TurnoverDesc,
}

impl CustomerSort {
    /// Chave desconhecida = sem ordenação.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim() {
            "name" => Some(CustomerSort::NameAsc),
            "-name" => Some(CustomerSort::NameDesc),
            "-turnover" => Some(CustomerSort::TurnoverDesc),
            _ => None,
        }
    }
}

// None, "" e "All" desligam o filtro.
fn active(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

fn matches_search(term: &str, fields: &[&str]) -> bool {
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(term))
}

fn search_term(search: &Option<String>) -> String {
    search.as_deref().map(str::trim).unwrap_or_default().to_lowercase()
}

/// Filtros, busca, ordenação e contadores sobre snapshots em memória.
/// As entradas nunca são alteradas; o resultado empresta delas.
#[derive(Clone)]
pub struct QueryService {
    location: LocationService,
}

impl QueryService {
    pub fn new(location: LocationService) -> Self {
        Self { location }
    }

    /// Derivada a cada chamada, nunca gravada no registro.
    pub fn zone_of(&self, customer: &Customer) -> String {
        self.location
            .derive_zone(customer.zone.as_deref(), &customer.state, &customer.city)
    }

    pub fn query_customers<'a>(&self, customers: &'a [Customer], query: &CustomerQuery) -> Vec<&'a Customer> {
        let term = search_term(&query.search);
        let zone = active(&query.zone);
        let state = active(&query.state);
        let city = active(&query.city);
        let status = active(&query.status);

        let mut result: Vec<&Customer> = customers
            .iter()
            .filter(|c| matches_search(&term, &[c.name.as_str(), c.city.as_str(), c.state.as_str()]))
            .filter(|c| zone.is_none_or(|z| self.zone_of(c) == z))
            .filter(|c| state.is_none_or(|s| c.state == s))
            .filter(|c| city.is_none_or(|ct| c.city == ct))
            .filter(|c| status.is_none_or(|st| c.status.as_str() == st))
            .collect();

        if let Some(sort) = query.sort.as_deref().and_then(CustomerSort::parse) {
            sort_customers(&mut result, sort);
        }

        result
    }

    /// Mais recentes primeiro; visitas na mesma data mantêm a ordem da coleção.
    pub fn query_visits<'a>(&self, visits: &'a [Visit], query: &VisitQuery) -> Vec<&'a Visit> {
        let term = search_term(&query.search);
        let status = active(&query.status);

        let mut result: Vec<&Visit> = visits
            .iter()
            .filter(|v| matches_search(
                &term,
                &[v.customer_name.as_str(), v.purpose.as_str(), v.assigned_to.as_str()],
            ))
            .filter(|v| status.is_none_or(|st| v.status.as_str() == st))
            .filter(|v| query.customer_id.is_none_or(|id: Uuid| v.customer_id == id))
            .collect();

        // sort_by é estável
        result.sort_by(|a, b| b.date.cmp(&a.date));
        result
    }

    /// Zonas da tabela de referência, na ordem da tabela.
    pub fn zones(&self) -> Vec<String> {
        self.location
            .reference()
            .zones()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// "All" primeiro, depois cada zona da tabela, depois "Other".
    /// As contagens ignoram os filtros ativos de quem chama.
    pub fn zone_counts(&self, customers: &[Customer]) -> Vec<CategoryCount> {
        let zones: Vec<String> = customers.iter().map(|c| self.zone_of(c)).collect();

        let mut categories = self.zones();
        if !categories.iter().any(|z| z == OTHER_ZONE) {
            categories.push(OTHER_ZONE.to_string());
        }
        // Overrides podem citar zonas que a tabela não conhece.
        for zone in &zones {
            if !categories.contains(zone) {
                categories.push(zone.clone());
            }
        }

        let mut counts = vec![CategoryCount { category: ALL.to_string(), count: customers.len() }];
        counts.extend(categories.into_iter().map(|category| {
            let count = zones.iter().filter(|z| **z == category).count();
            CategoryCount { category, count }
        }));
        counts
    }

    pub fn customer_status_counts(&self, customers: &[Customer]) -> Vec<CategoryCount> {
        let mut counts = vec![CategoryCount { category: ALL.to_string(), count: customers.len() }];
        counts.extend(CustomerStatus::ALL.iter().map(|status| CategoryCount {
            category: status.as_str().to_string(),
            count: customers.iter().filter(|c| c.status == *status).count(),
        }));
        counts
    }

    pub fn visit_status_counts(&self, visits: &[Visit]) -> Vec<CategoryCount> {
        let mut counts = vec![CategoryCount { category: ALL.to_string(), count: visits.len() }];
        counts.extend(VisitStatus::ALL.iter().map(|status| CategoryCount {
            category: status.as_str().to_string(),
            count: visits.iter().filter(|v| v.status == *status).count(),
        }));
        counts
    }
}

pub fn sort_customers(customers: &mut [&Customer], sort: CustomerSort) {
    let by_name = |a: &&Customer, b: &&Customer| -> Ordering {
        a.name.to_lowercase().cmp(&b.name.to_lowercase())
    };
    match sort {
        CustomerSort::NameAsc => customers.sort_by(by_name),
        CustomerSort::NameDesc => customers.sort_by(|a, b| by_name(b, a)),
        CustomerSort::TurnoverDesc => {
            customers.sort_by(|a, b| b.annual_turnover.cmp(&a.annual_turnover))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::geo::GeoReference;

    fn service() -> QueryService {
        QueryService::new(LocationService::new(Arc::new(GeoReference::builtin())))
    }

    fn customer(name: &str, city: &str, state: &str, status: CustomerStatus, turnover: i64) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: name.into(),
            city: city.into(),
            state: state.into(),
            country: "India".into(),
            pincode: String::new(),
            area: String::new(),
            industry: String::new(),
            annual_turnover: turnover,
            project_turnover: 0,
            enquiry_no: String::new(),
            status,
            last_interaction: None,
            zone: None,
            contacts: Vec::new(),
            pricing_history: Vec::new(),
            last_modified_by: "Priya".into(),
            updated_at: String::new(),
        }
    }

    fn visit(customer_name: &str, date: (i32, u32, u32), purpose: &str, status: VisitStatus) -> Visit {
        Visit {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            customer_name: customer_name.into(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            purpose: purpose.into(),
            assigned_to: "Priya".into(),
            status,
            notes: String::new(),
            last_modified_by: "Priya".into(),
            updated_at: String::new(),
        }
    }

    fn book() -> Vec<Customer> {
        vec![
            customer("Acme Polymers", "Ludhiana", "Punjab", CustomerStatus::Open, 50_000_000),
            customer("Bharat Steel", "Pune", "Maharashtra", CustomerStatus::Closed, 90_000_000),
            customer("Chennai Pack", "Chennai", "Tamil Nadu", CustomerStatus::Open, 10_000_000),
            customer("Delta Agro", "Hosur", "N/A", CustomerStatus::Open, 0),
            customer("Echo Foods", "Gotham", "N/A", CustomerStatus::Closed, 5),
        ]
    }

    fn names(result: &[&Customer]) -> Vec<String> {
        result.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_keeps_collection_order() {
        let customers = book();
        let result = service().query_customers(&customers, &CustomerQuery::default());
        assert_eq!(names(&result), names(&customers.iter().collect::<Vec<_>>()));
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_city_state() {
        let customers = book();
        let svc = service();
        let by = |term: &str| {
            let q = CustomerQuery { search: Some(term.into()), ..Default::default() };
            names(&svc.query_customers(&customers, &q))
        };
        assert_eq!(by("acme"), vec!["Acme Polymers"]);
        assert_eq!(by("PUNE"), vec!["Bharat Steel"]);
        assert_eq!(by("tamil"), vec!["Chennai Pack"]);
        assert!(by("zzz").is_empty());
    }

    #[test]
    fn test_zone_filter_uses_derived_zone() {
        let customers = book();
        let q = CustomerQuery { zone: Some("South".into()), ..Default::default() };
        // Delta Agro não tem estado, mas Hosur está listada em Tamil Nadu
        assert_eq!(names(&service().query_customers(&customers, &q)), vec!["Chennai Pack", "Delta Agro"]);

        let q = CustomerQuery { zone: Some("Other".into()), ..Default::default() };
        assert_eq!(names(&service().query_customers(&customers, &q)), vec!["Echo Foods"]);
    }

    #[test]
    fn test_all_sentinel_equals_absent_filter() {
        let customers = book();
        let svc = service();
        let absent = svc.query_customers(&customers, &CustomerQuery::default());
        let all = svc.query_customers(
            &customers,
            &CustomerQuery {
                zone: Some(ALL.into()),
                state: Some(ALL.into()),
                city: Some(ALL.into()),
                status: Some(ALL.into()),
                ..Default::default()
            },
        );
        assert_eq!(names(&absent), names(&all));
    }

    #[test]
    fn test_filters_are_a_conjunction() {
        let customers = book();
        let svc = service();
        let zones = ["All", "North", "West", "South", "Other"];
        let statuses = ["All", "Open", "Closed"];
        let searches = ["", "a", "pack"];

        for zone in zones {
            for status in statuses {
                for search in searches {
                    let q = CustomerQuery {
                        search: Some(search.into()),
                        zone: Some(zone.into()),
                        status: Some(status.into()),
                        ..Default::default()
                    };
                    let expected: Vec<String> = customers
                        .iter()
                        .filter(|c| zone == ALL || svc.zone_of(c) == zone)
                        .filter(|c| status == ALL || c.status.as_str() == status)
                        .filter(|c| {
                            [&c.name, &c.city, &c.state]
                                .iter()
                                .any(|f| f.to_lowercase().contains(search))
                        })
                        .map(|c| c.name.clone())
                        .collect();
                    assert_eq!(names(&svc.query_customers(&customers, &q)), expected);
                }
            }
        }
    }

    #[test]
    fn test_state_and_city_filters_are_exact() {
        let customers = book();
        let q = CustomerQuery { state: Some("Punjab".into()), ..Default::default() };
        assert_eq!(names(&service().query_customers(&customers, &q)), vec!["Acme Polymers"]);

        let q = CustomerQuery { city: Some("pune".into()), ..Default::default() };
        assert!(service().query_customers(&customers, &q).is_empty());
    }

    #[test]
    fn test_requested_sorts() {
        let customers = book();
        let svc = service();
        let sorted = |key: &str| {
            let q = CustomerQuery { sort: Some(key.into()), ..Default::default() };
            names(&svc.query_customers(&customers, &q))
        };
        assert_eq!(sorted("-turnover")[0], "Bharat Steel");
        assert_eq!(sorted("-name")[0], "Echo Foods");
        assert_eq!(sorted("name")[0], "Acme Polymers");
        assert_eq!(sorted("bogus")[0], "Acme Polymers");
    }

    #[test]
    fn test_visits_most_recent_first_and_stable() {
        let visits = vec![
            visit("A", (2024, 1, 5), "first", VisitStatus::Planned),
            visit("B", (2024, 3, 1), "second", VisitStatus::Completed),
            visit("C", (2024, 1, 5), "third", VisitStatus::Planned),
        ];
        let result = service().query_visits(&visits, &VisitQuery::default());
        let order: Vec<&str> = result.iter().map(|v| v.purpose.as_str()).collect();
        assert_eq!(order, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_visit_search_and_status() {
        let mut visits = vec![
            visit("Acme Polymers", (2024, 1, 5), "Demo", VisitStatus::Planned),
            visit("Bharat Steel", (2024, 2, 5), "Payment follow-up", VisitStatus::Cancelled),
        ];
        visits[1].assigned_to = "Arjun".into();
        let svc = service();

        let q = VisitQuery { search: Some("arjun".into()), ..Default::default() };
        assert_eq!(svc.query_visits(&visits, &q).len(), 1);

        let q = VisitQuery { search: Some("demo".into()), status: Some("Cancelled".into()), ..Default::default() };
        assert!(svc.query_visits(&visits, &q).is_empty());

        let q = VisitQuery { customer_id: Some(visits[0].customer_id), ..Default::default() };
        assert_eq!(svc.query_visits(&visits, &q)[0].customer_name, "Acme Polymers");
    }

    #[test]
    fn test_counts_cover_the_full_collection() {
        let mut customers = book();
        customers[0].zone = Some("Key Accounts".into());
        let counts = service().zone_counts(&customers);

        let count_of = |zone: &str| counts.iter().find(|c| c.category == zone).map(|c| c.count);
        assert_eq!(counts[0], CategoryCount { category: ALL.into(), count: 5 });
        assert_eq!(count_of("North"), Some(0));
        assert_eq!(count_of("West"), Some(1));
        assert_eq!(count_of("South"), Some(2));
        assert_eq!(count_of("Other"), Some(1));
        assert_eq!(count_of("Key Accounts"), Some(1));

        let statuses = service().customer_status_counts(&customers);
        assert_eq!(statuses.iter().map(|c| c.count).collect::<Vec<_>>(), vec![5, 3, 2]);
    }

    #[test]
    fn test_visit_status_counts() {
        let visits = vec![
            visit("A", (2024, 1, 5), "x", VisitStatus::Planned),
            visit("B", (2024, 1, 6), "y", VisitStatus::Rescheduled),
            visit("C", (2024, 1, 7), "z", VisitStatus::Planned),
        ];
        let counts = service().visit_status_counts(&visits);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.category.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![("All", 3), ("Planned", 2), ("Completed", 0), ("Cancelled", 0), ("Rescheduled", 1)]
        );
    }
}

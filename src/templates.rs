//! Built-in query templates.
//!
//! Picking a template replaces the shared query text; it does not execute.
//! Several templates use joins or aggregates that the executor ignores; they
//! still resolve to the table named by their first `FROM`.

/// A named query the user can load into the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub category: &'static str,
    pub name: &'static str,
    pub sql: &'static str,
    pub description: &'static str,
}

/// All templates, grouped by category in display order.
pub const TEMPLATES: &[Template] = &[
    Template {
        category: "Products",
        name: "All Products",
        sql: "SELECT * FROM products;",
        description: "List all products in the catalog",
    },
    Template {
        category: "Products",
        name: "Products by Category",
        sql: "SELECT p.ProductName, c.CategoryName\nFROM products p\nJOIN categories c ON p.CategoryID = c.CategoryID;",
        description: "Show products with their categories",
    },
    Template {
        category: "Products",
        name: "Most Expensive Products",
        sql: "SELECT ProductName, UnitPrice\nFROM products\nORDER BY UnitPrice DESC\nLIMIT 10;",
        description: "Top 10 most expensive products",
    },
    Template {
        category: "Customers",
        name: "All Customers",
        sql: "SELECT * FROM customers;",
        description: "List all customers",
    },
    Template {
        category: "Customers",
        name: "Customers by Country",
        sql: "SELECT Country, COUNT(*) as CustomerCount\nFROM customers\nGROUP BY Country\nORDER BY CustomerCount DESC;",
        description: "Count of customers by country",
    },
    Template {
        category: "Customers",
        name: "Top Customers by Sales",
        sql: "SELECT\n  c.CustomerID,\n  c.CompanyName,\n  SUM(od.Quantity * od.UnitPrice) as TotalPurchases\nFROM customers c\nJOIN orders o ON c.CustomerID = o.CustomerID\nJOIN order_details od ON o.OrderID = od.OrderID\nGROUP BY c.CustomerID\nORDER BY TotalPurchases DESC\nLIMIT 10;",
        description: "Top 10 customers by total purchase amount",
    },
    Template {
        category: "Orders",
        name: "All Orders",
        sql: "SELECT * FROM orders;",
        description: "List all orders",
    },
    Template {
        category: "Orders",
        name: "Orders by Employee",
        sql: "SELECT\n  e.FirstName,\n  e.LastName,\n  COUNT(o.OrderID) as OrderCount\nFROM employees e\nJOIN orders o ON e.EmployeeID = o.EmployeeID\nGROUP BY e.EmployeeID\nORDER BY OrderCount DESC;",
        description: "Number of orders handled by each employee",
    },
    Template {
        category: "Orders",
        name: "Recent Orders",
        sql: "SELECT * FROM orders\nORDER BY OrderDate DESC\nLIMIT 20;",
        description: "Most recent 20 orders",
    },
    Template {
        category: "Employees",
        name: "All Employees",
        sql: "SELECT * FROM employees;",
        description: "List all employees",
    },
    Template {
        category: "Employees",
        name: "Employees by Region",
        sql: "SELECT\n  e.FirstName,\n  e.LastName,\n  t.TerritoryDescription\nFROM employees e\nJOIN employee_territories et ON e.EmployeeID = et.EmployeeID\nJOIN territories t ON et.TerritoryID = t.TerritoryID;",
        description: "Employees and their territories",
    },
];

/// Finds a template by name, ignoring case.
pub fn find(name: &str) -> Option<&'static Template> {
    TEMPLATES
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(name.trim()))
}

/// Returns the category names in display order.
pub fn categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for template in TEMPLATES {
        if !categories.contains(&template.category) {
            categories.push(template.category);
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TableName;
    use crate::query::parse;

    #[test]
    fn test_categories_in_order() {
        assert_eq!(
            categories(),
            vec!["Products", "Customers", "Orders", "Employees"]
        );
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let template = find("recent orders").unwrap();
        assert_eq!(template.category, "Orders");
        assert!(find("Nope").is_none());
    }

    #[test]
    fn test_every_template_resolves_to_a_known_table() {
        for template in TEMPLATES {
            let parsed = parse(template.sql).unwrap();
            assert!(
                TableName::from_identifier(&parsed.table).is_some(),
                "{} resolves to {}",
                template.name,
                parsed.table
            );
        }
    }

    #[test]
    fn test_limits() {
        assert_eq!(parse(find("Most Expensive Products").unwrap().sql).unwrap().limit, Some(10));
        assert_eq!(parse(find("Recent Orders").unwrap().sql).unwrap().limit, Some(20));
        assert_eq!(parse(find("All Orders").unwrap().sql).unwrap().limit, None);
    }
}

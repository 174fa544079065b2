//! SQL query constants
//!
//! Contains all SQL statements issued against the customer table.

/// Expected shape of the customer table. Not executed by the service.
#[allow(dead_code)]
pub const CUSTOMER_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS customer (
        customerid SERIAL PRIMARY KEY,
        customername TEXT NOT NULL
    )
"#;

/// Connectivity probe run once at startup
pub const PING: &str = "SELECT 1";

pub const LIST_CUSTOMERS: &str = r#"
    SELECT customerid, customername
    FROM customer
    ORDER BY customerid
"#;

pub const GET_CUSTOMER: &str = r#"
    SELECT customerid, customername
    FROM customer
    WHERE customerid = $1
"#;

pub const INSERT_CUSTOMER: &str = r#"
    INSERT INTO customer (customername)
    VALUES ($1)
    RETURNING customerid, customername
"#;

pub const UPDATE_CUSTOMER: &str = r#"
    UPDATE customer
    SET customername = $1
    WHERE customerid = $2
    RETURNING customerid, customername
"#;

pub const DELETE_CUSTOMER: &str = "DELETE FROM customer WHERE customerid = $1";

//! Static assignment tables.
//!
//! Department and role mappings are fixed at compile time. Unknown keys
//! resolve to empty, never to an error: an unrecognized department still
//! gets the default group, an unrecognized role simply attaches nothing.

/// Group every provisioned user joins, regardless of department.
pub const DEFAULT_GROUP: &str = "StandardUsers";

/// Groups a department's users join beyond [`DEFAULT_GROUP`].
pub fn department_groups(department: &str) -> &'static [&'static str] {
    match department {
        "IT" => &["IT-Users", "VPN-Access", "CloudWatch-ReadOnly"],
        "Finance" => &["Finance-Users", "Billing-ReadOnly"],
        "HR" => &["HR-Users", "Employee-Records-Access"],
        "Engineering" => &["Engineering-Users", "Developer-Tools", "S3-Dev-Access"],
        "Marketing" => &["Marketing-Users", "Analytics-ReadOnly"],
        "Sales" => &["Sales-Users", "CRM-Access"],
        _ => &[],
    }
}

/// Managed policy ARNs attached for a role.
pub fn role_policies(role: &str) -> &'static [&'static str] {
    match role {
        "Developer" => &["arn:aws:iam::aws:policy/PowerUserAccess"],
        "Analyst" => &["arn:aws:iam::aws:policy/ReadOnlyAccess"],
        "Admin" => &["arn:aws:iam::aws:policy/AdministratorAccess"],
        "Manager" => &["arn:aws:iam::aws:policy/ReadOnlyAccess"],
        _ => &[],
    }
}

/// Full group assignment for a department: the default group first, then
/// the department's own groups in table order.
pub fn groups_for_department(department: &str) -> Vec<String> {
    std::iter::once(DEFAULT_GROUP)
        .chain(department_groups(department).iter().copied())
        .map(str::to_string)
        .collect()
}

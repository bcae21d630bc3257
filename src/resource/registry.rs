//! The static resource registry: one `ResourceDef` per exposed entity.
//!
//! Field sets mirror the clinic data model; status values are lowercase
//! snake_case throughout. Users are deliberately absent here - they are only
//! reachable through the auth endpoints.

use super::descriptor::{opt, req, FieldKind::*, ResourceDef, StatusDef};

pub static DOCTORS: ResourceDef = ResourceDef {
    name: "doctors",
    table: "doctors",
    list_key: "doctors",
    fields: &[
        req("name", Text),
        req("email", Text),
        opt("phone", Text),
        opt("specialization", Text),
        opt("experience", Integer),
        opt("schedule", Text),
        opt("avatar", Text),
    ],
    searchable: &["name", "email", "specialization"],
    filterable: &["specialization"],
    status: None,
};

pub static PATIENTS: ResourceDef = ResourceDef {
    name: "patients",
    table: "patients",
    list_key: "patients",
    fields: &[
        req("name", Text),
        opt("email", Text),
        opt("phone", Text),
        opt("dob", Date),
        opt("gender", Text),
        opt("address", Text),
        opt("history", Text),
    ],
    searchable: &["name", "email", "phone"],
    filterable: &["gender"],
    status: None,
};

pub static APPOINTMENTS: ResourceDef = ResourceDef {
    name: "appointments",
    table: "appointments",
    list_key: "appointments",
    fields: &[
        req("doctor_id", Uuid),
        req("patient_id", Uuid),
        req("date", DateTime),
        opt("time", Text),
        opt("status", Status),
        opt("notes", Text),
    ],
    searchable: &["notes"],
    filterable: &["status", "doctor_id", "patient_id"],
    status: Some(StatusDef {
        values: &["pending", "confirmed", "completed", "cancelled"],
        default: "pending",
        transitions: Some(&[
            ("pending", &["confirmed", "cancelled"]),
            ("confirmed", &["completed", "cancelled"]),
        ]),
    }),
};

pub static PRESCRIPTIONS: ResourceDef = ResourceDef {
    name: "prescriptions",
    table: "prescriptions",
    list_key: "prescriptions",
    fields: &[
        req("patient_id", Uuid),
        req("doctor_id", Uuid),
        opt("prescription_type", Text),
        opt("prescription_date", DateTime),
        opt("diagnosis", Text),
        req("medications", Text),
        opt("notes_for_pharmacist", Text),
        opt("status", Status),
    ],
    searchable: &["medications", "diagnosis"],
    filterable: &["status", "patient_id", "doctor_id"],
    status: Some(StatusDef {
        values: &["active", "completed", "cancelled"],
        default: "active",
        transitions: None,
    }),
};

pub static MEDICINES: ResourceDef = ResourceDef {
    name: "medicines",
    table: "medicines",
    list_key: "medicines",
    fields: &[
        req("name", Text),
        opt("generic_name", Text),
        req("category", Text),
        opt("medicine_type", Text),
        opt("description", Text),
        opt("manufacturer", Text),
        opt("supplier", Text),
        opt("expiry_date", Date),
        opt("batch_number", Text),
        opt("dosage", Text),
        opt("quantity", Integer),
        opt("reorder_level", Integer),
        opt("purchase_price", Float),
        opt("selling_price", Float),
    ],
    searchable: &["name", "generic_name", "category", "manufacturer"],
    filterable: &["category", "medicine_type"],
    status: None,
};

pub static SUPPLIERS: ResourceDef = ResourceDef {
    name: "suppliers",
    table: "suppliers",
    list_key: "suppliers",
    fields: &[
        req("name", Text),
        opt("category", Text),
        opt("contact", Text),
        opt("email", Text),
        opt("phone", Text),
        opt("location", Text),
        opt("rating", Float),
        opt("status", Status),
        opt("description", Text),
        opt("contact_person", Text),
    ],
    searchable: &["name", "category", "email"],
    filterable: &["status", "category"],
    status: Some(StatusDef {
        values: &["active", "inactive"],
        default: "active",
        transitions: None,
    }),
};

pub static INVENTORY_ALERTS: ResourceDef = ResourceDef {
    name: "inventory-alerts",
    table: "inventory_alerts",
    list_key: "alerts",
    fields: &[
        opt("medicine_id", Uuid),
        req("name", Text),
        opt("category", Text),
        req("current_stock", Integer),
        req("min_level", Integer),
        opt("status", Status),
        opt("supplier", Text),
    ],
    searchable: &["name", "category", "supplier"],
    filterable: &["status", "category"],
    status: Some(StatusDef {
        values: &["low", "critical", "resolved"],
        default: "low",
        transitions: Some(&[
            ("low", &["critical", "resolved"]),
            ("critical", &["resolved"]),
        ]),
    }),
};

pub static INVOICES: ResourceDef = ResourceDef {
    name: "invoices",
    table: "invoices",
    list_key: "invoices",
    fields: &[
        req("patient_id", Uuid),
        req("amount", Float),
        opt("status", Status),
        opt("due_date", Date),
        opt("notes", Text),
    ],
    searchable: &["notes"],
    filterable: &["status", "patient_id"],
    status: Some(StatusDef {
        values: &["pending", "paid", "cancelled"],
        default: "pending",
        transitions: None,
    }),
};

pub static ROOMS: ResourceDef = ResourceDef {
    name: "rooms",
    table: "rooms",
    list_key: "rooms",
    fields: &[
        req("room_number", Text),
        opt("room_type", Text),
        opt("department", Text),
        opt("floor", Integer),
        opt("daily_rate", Float),
        opt("status", Status),
    ],
    searchable: &["room_number", "room_type", "department"],
    filterable: &["status", "room_type", "department"],
    status: Some(StatusDef {
        values: &["available", "occupied", "maintenance"],
        default: "available",
        transitions: None,
    }),
};

pub static ROOM_ALLOTMENTS: ResourceDef = ResourceDef {
    name: "room-allotments",
    table: "room_allotments",
    list_key: "allotments",
    fields: &[
        req("patient_id", Uuid),
        req("patient_name", Text),
        opt("patient_phone", Text),
        req("room_id", Uuid),
        req("attending_doctor", Text),
        opt("emergency_contact", Text),
        opt("special_requirements", Text),
        req("allotment_date", DateTime),
        opt("expected_discharge_date", DateTime),
        opt("status", Status),
        opt("payment_method", Text),
        opt("insurance_details", Text),
        opt("additional_notes", Text),
    ],
    searchable: &["patient_name", "attending_doctor"],
    filterable: &["status", "room_id", "patient_id"],
    status: Some(StatusDef {
        values: &["occupied", "discharged", "transferred"],
        default: "occupied",
        transitions: Some(&[
            ("occupied", &["discharged", "transferred"]),
            ("transferred", &["discharged"]),
        ]),
    }),
};

pub static STAFF: ResourceDef = ResourceDef {
    name: "staff",
    table: "staff",
    list_key: "staff",
    fields: &[
        req("first_name", Text),
        req("last_name", Text),
        req("email", Text),
        opt("phone", Text),
        opt("date_of_birth", Date),
        opt("gender", Text),
        opt("address", Text),
        opt("city", Text),
        opt("postal_code", Text),
        opt("country", Text),
        opt("emergency_contact", Text),
        opt("emergency_phone", Text),
        opt("relationship", Text),
        opt("role", Text),
        opt("department", Text),
        opt("joined_date", Date),
        opt("status", Status),
    ],
    searchable: &["first_name", "last_name", "email", "role", "department"],
    filterable: &["status", "department", "role"],
    status: Some(StatusDef {
        values: &["active", "inactive", "on_leave"],
        default: "active",
        transitions: None,
    }),
};

pub static ATTENDANCE: ResourceDef = ResourceDef {
    name: "attendance",
    table: "attendance",
    list_key: "attendance",
    fields: &[
        req("staff_id", Uuid),
        req("date", Date),
        opt("status", Status),
        opt("check_in", Text),
        opt("check_out", Text),
        opt("hours", Float),
    ],
    searchable: &[],
    filterable: &["staff_id", "status", "date"],
    status: Some(StatusDef {
        values: &["present", "absent", "leave"],
        default: "present",
        transitions: None,
    }),
};

pub static EMERGENCY_CALLS: ResourceDef = ResourceDef {
    name: "emergency-calls",
    table: "emergency_calls",
    list_key: "calls",
    fields: &[
        req("patient_name", Text),
        req("phone", Text),
        opt("location", Text),
        opt("emergency_type", Text),
        opt("priority", Text),
        opt("status", Status),
        opt("call_time", DateTime),
        opt("notes", Text),
    ],
    searchable: &["patient_name", "phone", "location"],
    filterable: &["status", "priority", "emergency_type"],
    status: Some(StatusDef {
        values: &["pending", "dispatched", "resolved", "cancelled"],
        default: "pending",
        transitions: Some(&[
            ("pending", &["dispatched", "cancelled"]),
            ("dispatched", &["resolved", "cancelled"]),
        ]),
    }),
};

pub static DEPARTMENTS: ResourceDef = ResourceDef {
    name: "departments",
    table: "departments",
    list_key: "departments",
    fields: &[
        req("name", Text),
        opt("description", Text),
        opt("head", Text),
        opt("phone", Text),
        opt("email", Text),
        opt("status", Status),
    ],
    searchable: &["name", "head"],
    filterable: &["status"],
    status: Some(StatusDef {
        values: &["active", "inactive"],
        default: "active",
        transitions: None,
    }),
};

pub static BLOOD_DONORS: ResourceDef = ResourceDef {
    name: "blood-donors",
    table: "blood_donors",
    list_key: "donors",
    fields: &[
        req("name", Text),
        req("blood_type", Text),
        opt("contact", Text),
        opt("email", Text),
        opt("date_of_birth", Date),
        opt("gender", Text),
        opt("address", Text),
        opt("city", Text),
        opt("phone_number", Text),
        opt("status", Status),
    ],
    searchable: &["name", "blood_type", "city"],
    filterable: &["blood_type", "status"],
    status: Some(StatusDef {
        values: &["active", "inactive"],
        default: "active",
        transitions: None,
    }),
};

pub static BLOOD_UNITS: ResourceDef = ResourceDef {
    name: "blood-units",
    table: "blood_units",
    list_key: "units",
    fields: &[
        req("blood_type", Text),
        opt("donor_id", Uuid),
        req("quantity", Integer),
        opt("collection_date", Date),
        opt("expiry_date", Date),
        opt("status", Status),
    ],
    searchable: &["blood_type"],
    filterable: &["blood_type", "status"],
    status: Some(StatusDef {
        values: &["available", "used", "expired"],
        default: "available",
        transitions: None,
    }),
};

pub static BLOOD_ISSUES: ResourceDef = ResourceDef {
    name: "blood-issues",
    table: "blood_issues",
    list_key: "issues",
    fields: &[
        req("recipient", Text),
        opt("recipient_id", Uuid),
        req("blood_type", Text),
        opt("blood_unit_id", Uuid),
        req("units", Integer),
        opt("issue_date", DateTime),
        opt("requesting_doctor", Text),
        opt("purpose", Text),
        opt("department", Text),
        opt("status", Status),
    ],
    searchable: &["recipient", "blood_type", "requesting_doctor"],
    filterable: &["blood_type", "status"],
    status: Some(StatusDef {
        values: &["pending", "completed", "cancelled"],
        default: "pending",
        transitions: None,
    }),
};

pub static PRESCRIPTION_TEMPLATES: ResourceDef = ResourceDef {
    name: "prescription-templates",
    table: "prescription_templates",
    list_key: "templates",
    fields: &[
        req("name", Text),
        opt("category", Text),
        req("medications", Text),
        opt("created_by", Text),
    ],
    searchable: &["name", "category"],
    filterable: &["category"],
    status: None,
};

pub static AMBULANCES: ResourceDef = ResourceDef {
    name: "ambulances",
    table: "ambulances",
    list_key: "ambulances",
    fields: &[
        req("name", Text),
        req("registration_number", Text),
        opt("driver_name", Text),
        opt("driver_phone", Text),
        opt("status", Status),
        opt("location", Text),
    ],
    searchable: &["name", "registration_number", "driver_name"],
    filterable: &["status"],
    status: Some(StatusDef {
        values: &["available", "on_duty", "maintenance"],
        default: "available",
        transitions: None,
    }),
};

pub static INSURANCE_CLAIMS: ResourceDef = ResourceDef {
    name: "insurance-claims",
    table: "insurance_claims",
    list_key: "claims",
    fields: &[
        req("patient_id", Uuid),
        req("amount", Float),
        opt("claim_number", Text),
        opt("notes", Text),
        opt("status", Status),
    ],
    searchable: &["claim_number"],
    filterable: &["status", "patient_id"],
    status: Some(StatusDef {
        values: &["pending", "approved", "rejected"],
        default: "pending",
        transitions: None,
    }),
};

pub static REVIEWS: ResourceDef = ResourceDef {
    name: "reviews",
    table: "reviews",
    list_key: "reviews",
    fields: &[
        req("type", Text),
        req("subject_name", Text),
        req("rating", Integer),
        opt("comment", Text),
        opt("reviewer_name", Text),
        opt("status", Status),
    ],
    searchable: &["subject_name", "reviewer_name"],
    filterable: &["status", "type"],
    status: Some(StatusDef {
        values: &["active", "hidden"],
        default: "active",
        transitions: None,
    }),
};

pub static RECORDS: ResourceDef = ResourceDef {
    name: "records",
    table: "records",
    list_key: "records",
    fields: &[
        req("type", Text),
        req("patient_name", Text),
        req("date", DateTime),
        opt("details", Text),
        opt("status", Status),
    ],
    searchable: &["patient_name", "type"],
    filterable: &["status", "type"],
    status: Some(StatusDef {
        values: &["active", "archived"],
        default: "active",
        transitions: None,
    }),
};

pub static FEEDBACK: ResourceDef = ResourceDef {
    name: "feedback",
    table: "feedback",
    list_key: "feedbacks",
    fields: &[
        req("subject", Text),
        req("message", Text),
        opt("sender_name", Text),
        opt("sender_email", Text),
        opt("category", Text),
        opt("status", Status),
    ],
    searchable: &["subject", "sender_name"],
    filterable: &["status", "category"],
    status: Some(StatusDef {
        values: &["pending", "reviewed", "resolved"],
        default: "pending",
        transitions: None,
    }),
};

pub static REPORTS: ResourceDef = ResourceDef {
    name: "reports",
    table: "reports",
    list_key: "reports",
    fields: &[
        req("type", Text),
        req("title", Text),
        opt("data", Text),
        opt("period", Text),
        opt("generated_by", Text),
    ],
    searchable: &["title", "type"],
    filterable: &["type"],
    status: None,
};

pub static SPECIALIZATIONS: ResourceDef = ResourceDef {
    name: "specializations",
    table: "specializations",
    list_key: "specializations",
    fields: &[
        req("name", Text),
        opt("description", Text),
        opt("department", Text),
        opt("doctor_count", Integer),
        opt("status", Status),
    ],
    searchable: &["name", "description", "department"],
    filterable: &["status", "department"],
    status: Some(StatusDef {
        values: &["active", "inactive"],
        default: "active",
        transitions: None,
    }),
};

/// Staff login accounts; reached only through the auth endpoints.
pub static USERS: ResourceDef = ResourceDef {
    name: "users",
    table: "users",
    list_key: "users",
    fields: &[
        req("name", Text),
        req("email", Text),
        req("password", Text),
        opt("role", Text),
        opt("avatar", Text),
    ],
    searchable: &["name", "email"],
    filterable: &["role"],
    status: None,
};

static RESOURCES: &[&ResourceDef] = &[
    &DOCTORS,
    &PATIENTS,
    &APPOINTMENTS,
    &PRESCRIPTIONS,
    &PRESCRIPTION_TEMPLATES,
    &MEDICINES,
    &SUPPLIERS,
    &INVENTORY_ALERTS,
    &INVOICES,
    &ROOMS,
    &ROOM_ALLOTMENTS,
    &STAFF,
    &ATTENDANCE,
    &EMERGENCY_CALLS,
    &DEPARTMENTS,
    &BLOOD_DONORS,
    &BLOOD_UNITS,
    &BLOOD_ISSUES,
    &AMBULANCES,
    &INSURANCE_CLAIMS,
    &REVIEWS,
    &RECORDS,
    &FEEDBACK,
    &REPORTS,
    &SPECIALIZATIONS,
];

/// Resolve a path segment to its resource definition.
pub fn lookup(name: &str) -> Option<&'static ResourceDef> {
    RESOURCES.iter().copied().find(|def| def.name == name)
}

/// All publicly routed resources.
pub fn all() -> &'static [&'static ResourceDef] {
    RESOURCES
}

//! Simulated hospital records for the reference workflows.
//!
//! All data in this module is hardcoded and fictional.  It stands in for the
//! registration, laboratory, pharmacy, and finance tables of a real
//! deployment.

// ── Staff ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffMember {
    pub id: u32,
    pub username: &'static str,
    pub role: &'static str,
    /// Workstation the member usually signs in from.
    pub ip: &'static str,
}

pub const STAFF: &[StaffMember] = &[
    StaffMember { id: 11, username: "reception.achieng", role: "Reception", ip: "10.20.1.14" },
    StaffMember { id: 17, username: "dr.mwangi", role: "Doctor", ip: "10.20.3.41" },
    StaffMember { id: 23, username: "lab.otieno", role: "LabTech", ip: "10.20.5.8" },
    StaffMember { id: 29, username: "rad.kamau", role: "Radiologist", ip: "10.20.5.22" },
    StaffMember { id: 31, username: "pharm.njeri", role: "Pharmacist", ip: "10.20.2.9" },
    StaffMember { id: 37, username: "finance.wafula", role: "Finance", ip: "10.20.7.3" },
    StaffMember { id: 41, username: "nurse.wanjiru", role: "Nurse", ip: "10.20.3.17" },
];

/// Look up a staff member by role.
pub fn staff_with_role(role: &str) -> Option<&'static StaffMember> {
    STAFF.iter().find(|s| s.role == role)
}

// ── Patients ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patient {
    /// Unique patient identifier issued at registration.
    pub upi: &'static str,
    pub national_id: &'static str,
    pub full_name: &'static str,
}

pub const PATIENTS: &[Patient] = &[
    Patient { upi: "KEN-00001", national_id: "29384756", full_name: "Amani Chebet" },
    Patient { upi: "KEN-00002", national_id: "31827465", full_name: "Baraka Ouma" },
    Patient { upi: "KEN-00003", national_id: "27465839", full_name: "Zawadi Mutua" },
];

// ── Orders and billing ────────────────────────────────────────────────────────

pub const LAB_TESTS: &[&str] = &["CBC", "LFT", "Malaria RDT"];
pub const IMAGING_STUDIES: &[&str] = &["Chest X-Ray", "Abdominal Ultrasound"];
pub const DRUGS: &[(&str, u32)] = &[("Amoxicillin 500mg", 21), ("Paracetamol 1g", 12)];

/// Price list in Kenyan shillings.
pub fn price_for(item: &str) -> u32 {
    match item {
        "CBC" => 800,
        "LFT" => 1_500,
        "Malaria RDT" => 300,
        "Chest X-Ray" => 2_500,
        "Abdominal Ultrasound" => 3_200,
        "Amoxicillin 500mg" => 420,
        "Paracetamol 1g" => 150,
        _ => 0,
    }
}

// ── Referral network ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facility {
    pub code: &'static str,
    pub name: &'static str,
    /// Address the facility's integration gateway calls from.
    pub gateway_ip: &'static str,
}

pub const REFERRAL_FACILITIES: &[Facility] = &[
    Facility { code: "KNH", name: "Kenyatta National Hospital", gateway_ip: "196.201.214.10" },
    Facility { code: "MTRH", name: "Moi Teaching and Referral Hospital", gateway_ip: "196.201.220.44" },
];

// ── Integration agents ────────────────────────────────────────────────────────

/// Token the on-site data-as-a-service agent presents when submitting events.
pub const DAAS_AGENT_TOKEN: &str = "demo-token-123";

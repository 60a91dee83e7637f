use serde_json::json;

use shared_models::auth::Role;

use crate::models::{DashboardStats, SectionDescriptor, StatCard};

const ADMIN_SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor { id: "dashboard", label: "Dashboard" },
    SectionDescriptor { id: "appointments", label: "Agendamentos" },
    SectionDescriptor { id: "patients", label: "Pacientes" },
    SectionDescriptor { id: "doctors", label: "Médicos" },
    SectionDescriptor { id: "financial", label: "Financeiro" },
    SectionDescriptor { id: "inventory", label: "Estoque" },
    SectionDescriptor { id: "reports", label: "Relatórios" },
    SectionDescriptor { id: "settings", label: "Configurações" },
];

const DOCTOR_SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor { id: "dashboard", label: "Dashboard" },
    SectionDescriptor { id: "appointments", label: "Minha Agenda" },
    SectionDescriptor { id: "patients", label: "Meus Pacientes" },
    SectionDescriptor { id: "prescriptions", label: "Receitas" },
    SectionDescriptor { id: "schedule", label: "Horários" },
];

const RECEPTIONIST_SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor { id: "dashboard", label: "Dashboard" },
    SectionDescriptor { id: "appointments", label: "Agendamentos" },
    SectionDescriptor { id: "patients", label: "Pacientes" },
    SectionDescriptor { id: "financial", label: "Caixa" },
];

const PATIENT_SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor { id: "dashboard", label: "Meus Dados" },
    SectionDescriptor { id: "appointments", label: "Consultas" },
    SectionDescriptor { id: "history", label: "Histórico" },
    SectionDescriptor { id: "schedule", label: "Agendar" },
];

/// Ordered menu sections for a role. A lookup table, not a conditional
/// scattered through rendering code.
pub fn sections_for_role(role: Role) -> &'static [SectionDescriptor] {
    match role {
        Role::Admin => ADMIN_SECTIONS,
        Role::Doctor => DOCTOR_SECTIONS,
        Role::Receptionist => RECEPTIONIST_SECTIONS,
        Role::Patient => PATIENT_SECTIONS,
    }
}

/// Which counters a role sees, in display order. Everyone gets the two base
/// cards; admins see the financial and inventory counters as well.
pub fn stat_cards_for_role(role: Role, stats: &DashboardStats) -> Vec<StatCard> {
    let mut cards = vec![
        StatCard {
            id: "today_appointments",
            title: "Consultas Hoje",
            value: json!(stats.today_appointments),
        },
        StatCard {
            id: "total_patients",
            title: "Total Pacientes",
            value: json!(stats.total_patients),
        },
    ];

    if role == Role::Admin {
        cards.push(StatCard {
            id: "monthly_revenue",
            title: "Receita Mensal",
            value: json!(format!("R$ {:.2}", stats.monthly_revenue)),
        });
        cards.push(StatCard {
            id: "low_stock_items",
            title: "Estoque Baixo",
            value: json!(stats.low_stock_items),
        });
    }

    if matches!(role, Role::Admin | Role::Doctor) {
        cards.push(StatCard {
            id: "pending_appointments",
            title: "Agendamentos Pendentes",
            value: json!(stats.pending_appointments),
        });
        cards.push(StatCard {
            id: "completed_appointments",
            title: "Consultas Concluídas",
            value: json!(stats.completed_appointments),
        });
    }

    cards
}

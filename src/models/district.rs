use serde::Serialize;
use utoipa::ToSchema;

// Dados de referência estáticos: os distritos de Tashkent.
// Usados apenas para filtro e exibição; nunca mudam em tempo de execução.

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct District {
    pub id: i32,
    pub name: &'static str,
}

pub const DISTRICTS: &[District] = &[
    District { id: 1, name: "Bektemir" },
    District { id: 2, name: "Chilonzor" },
    District { id: 3, name: "Mirobod" },
    District { id: 4, name: "Mirzo Ulug'bek" },
    District { id: 5, name: "Olmazor" },
    District { id: 6, name: "Sergeli" },
    District { id: 7, name: "Shayxontohur" },
    District { id: 8, name: "Uchtepa" },
    District { id: 9, name: "Yakkasaroy" },
    District { id: 10, name: "Yangihayon" },
    District { id: 11, name: "Yunusobod" },
];

pub fn district_name(id: i32) -> Option<&'static str> {
    DISTRICTS.iter().find(|d| d.id == id).map(|d| d.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busca_por_id() {
        assert_eq!(district_name(2), Some("Chilonzor"));
        assert_eq!(district_name(11), Some("Yunusobod"));
        assert_eq!(district_name(0), None);
        assert_eq!(district_name(12), None);
    }

    #[test]
    fn ids_sao_unicos_e_sequenciais() {
        for (i, d) in DISTRICTS.iter().enumerate() {
            assert_eq!(d.id, i as i32 + 1);
        }
    }
}

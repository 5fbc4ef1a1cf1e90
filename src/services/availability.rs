use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

// Motor de disponibilidade do calendário: função pura de (datas das reservas
// ativas, data de hoje) para a classificação dia a dia de uma janela rolante
// de 3 meses. Todas as datas já chegam normalizadas como NaiveDate (sem
// componente de hora); quem parte de um timestamp deve usar `date_naive()`
// antes de chamar aqui, senão a comparação de dias erra por um.

pub const WINDOW_MONTHS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// Estritamente antes de hoje. Tem precedência sobre `Booked`: num dia
    /// passado nenhuma ação é possível, reservado ou não.
    Past,
    Booked,
    Available,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthAvailability {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayAvailability>,
}

// Motivo pelo qual uma data não pode ser reservada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConflict {
    Past,
    Booked,
}

pub fn classify_day(date: NaiveDate, today: NaiveDate, booked: &HashSet<NaiveDate>) -> DayStatus {
    if date < today {
        DayStatus::Past
    } else if booked.contains(&date) {
        DayStatus::Booked
    } else {
        DayStatus::Available
    }
}

/// Valida a data de uma nova reserva contra o retrato atual das reservas.
/// O motor é consultivo: a palavra final é do índice único do banco.
pub fn check_bookable(
    date: NaiveDate,
    today: NaiveDate,
    booked: &HashSet<NaiveDate>,
) -> Result<(), DateConflict> {
    match classify_day(date, today, booked) {
        DayStatus::Past => Err(DateConflict::Past),
        DayStatus::Booked => Err(DateConflict::Booked),
        DayStatus::Available => Ok(()),
    }
}

/// Classifica cada dia da janela de 3 meses a partir do mês corrente.
pub fn availability_window(
    active_dates: &[NaiveDate],
    today: NaiveDate,
) -> Vec<MonthAvailability> {
    let booked: HashSet<NaiveDate> = active_dates.iter().copied().collect();

    (0..WINDOW_MONTHS)
        .map(|offset| {
            let (year, month) = month_at_offset(today, offset);
            let days = (1..=days_in_month(year, month))
                .map(|day| {
                    // Dentro do intervalo de dias do mês a data sempre existe
                    let date = NaiveDate::from_ymd_opt(year, month, day)
                        .expect("dia válido dentro do mês");
                    DayAvailability { date, status: classify_day(date, today, &booked) }
                })
                .collect();
            MonthAvailability { year, month, days }
        })
        .collect()
}

fn month_at_offset(today: NaiveDate, offset: u32) -> (i32, u32) {
    let month0 = today.month0() + offset;
    (today.year() + (month0 / 12) as i32, month0 % 12 + 1)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dia).unwrap()
    }

    #[test]
    fn cenario_junho_2025() {
        // Hoje é 10/06/2025 e existe reserva ativa em 15/06/2025
        let hoje = d(2025, 6, 10);
        let janela = availability_window(&[d(2025, 6, 15)], hoje);

        assert_eq!(janela.len(), 3);
        let junho = &janela[0];
        assert_eq!((junho.year, junho.month), (2025, 6));
        assert_eq!(junho.days.len(), 30);

        // Dias 1..=9 passaram
        for day in &junho.days[..9] {
            assert_eq!(day.status, DayStatus::Past, "{}", day.date);
        }
        // O 15 está no futuro e reservado: `booked` vence, não `past`
        assert_eq!(junho.days[14].status, DayStatus::Booked);
        // Hoje e os demais dias livres
        assert_eq!(junho.days[9].status, DayStatus::Available);
        assert_eq!(junho.days[29].status, DayStatus::Available);
    }

    #[test]
    fn passado_tem_precedencia_sobre_reservado() {
        let hoje = d(2025, 6, 10);
        let janela = availability_window(&[d(2025, 6, 5)], hoje);
        assert_eq!(janela[0].days[4].status, DayStatus::Past);
    }

    #[test]
    fn janela_avanca_pela_virada_do_ano() {
        let hoje = d(2025, 11, 20);
        let janela = availability_window(&[], hoje);
        let meses: Vec<_> = janela.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(meses, vec![(2025, 11), (2025, 12), (2026, 1)]);
    }

    #[test]
    fn fevereiro_bissexto() {
        let hoje = d(2024, 2, 1);
        let janela = availability_window(&[], hoje);
        assert_eq!(janela[0].days.len(), 29);

        let hoje = d(2025, 2, 1);
        let janela = availability_window(&[], hoje);
        assert_eq!(janela[0].days.len(), 28);
    }

    #[test]
    fn classificacao_e_pura_e_idempotente() {
        let hoje = d(2025, 6, 10);
        let datas = vec![d(2025, 6, 15), d(2025, 7, 1)];

        let a = availability_window(&datas, hoje);
        let b = availability_window(&datas, hoje);

        for (ma, mb) in a.iter().zip(b.iter()) {
            for (da, db) in ma.days.iter().zip(mb.days.iter()) {
                assert_eq!(da.status, db.status);
                assert_eq!(da.date, db.date);
            }
        }
    }

    #[test]
    fn check_bookable_rejeita_passado_e_reservado() {
        let hoje = d(2025, 6, 10);
        let booked: HashSet<_> = [d(2025, 6, 15)].into_iter().collect();

        // Ontem falha como passado mesmo sem ninguém ter reservado
        assert_eq!(check_bookable(d(2025, 6, 9), hoje, &booked), Err(DateConflict::Past));
        assert_eq!(check_bookable(d(2025, 6, 15), hoje, &booked), Err(DateConflict::Booked));
        assert_eq!(check_bookable(d(2025, 6, 20), hoje, &booked), Ok(()));
        // Hoje ainda é reservável
        assert_eq!(check_bookable(hoje, hoje, &booked), Ok(()));
    }
}

// src/common/dates.rs

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::reminders::Recurrence;

/// Último dia do mês (28 a 31).
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.pred_opt()?.day())
}

/// Data com o dia limitado ao fim do mês (dia 31 em fevereiro vira 28/29).
pub fn clamp_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Aniversário em um determinado ano. Quem nasceu em 29/02 comemora em 28/02
/// nos anos não bissextos.
pub fn anniversary_in(birth: NaiveDate, year: i32) -> Option<NaiveDate> {
    clamp_day(year, birth.month(), birth.day())
}

/// Dias até o próximo aniversário. Zero quando é hoje.
pub fn days_until_birthday(birth: NaiveDate, today: NaiveDate) -> i64 {
    let this_year = anniversary_in(birth, today.year());
    let next = match this_year {
        Some(date) if date >= today => Some(date),
        _ => anniversary_in(birth, today.year() + 1),
    };
    next.map(|date| (date - today).num_days()).unwrap_or(i64::MAX)
}

/// Idade completa em `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    if today < birth {
        return 0;
    }
    let mut age = today.year() - birth.year();
    match anniversary_in(birth, today.year()) {
        Some(date) if date > today => age -= 1,
        _ => {}
    }
    age.max(0) as u32
}

/// Próxima ocorrência de um lembrete recorrente. Mensal e anual voltam ao
/// `anchor_day` da série, limitado ao fim do mês (31/01 -> 28/02 -> 31/03).
pub fn next_occurrence(date: NaiveDate, recurrence: Recurrence, anchor_day: u32) -> Option<NaiveDate> {
    let months = match recurrence {
        Recurrence::None => return None,
        Recurrence::Daily => return date.checked_add_days(Days::new(1)),
        Recurrence::Weekly => return date.checked_add_days(Days::new(7)),
        Recurrence::Monthly => 1,
        Recurrence::Yearly => 12,
    };
    let target = month_start(date.year(), date.month())?.checked_add_months(Months::new(months))?;
    clamp_day(target.year(), target.month(), anchor_day)
}

/// Primeiro dia do mês.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Algo que tem data de nascimento (funcionários, idosos).
pub trait HasBirthDate {
    fn birth_date(&self) -> NaiveDate;
}

/// Filtra e ordena quem faz aniversário nos próximos `window_days` dias.
pub fn upcoming_birthdays<T: HasBirthDate>(
    people: Vec<T>,
    today: NaiveDate,
    window_days: i64,
) -> Vec<(T, i64)> {
    let mut upcoming: Vec<(T, i64)> = people
        .into_iter()
        .map(|p| {
            let days = days_until_birthday(p.birth_date(), today);
            (p, days)
        })
        .filter(|(_, days)| *days <= window_days)
        .collect();
    upcoming.sort_by_key(|(_, days)| *days);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn birthday_today_is_zero() {
        assert_eq!(days_until_birthday(d(1940, 6, 15), d(2025, 6, 15)), 0);
    }

    #[test]
    fn birthday_later_this_year() {
        assert_eq!(days_until_birthday(d(1950, 6, 20), d(2025, 6, 15)), 5);
    }

    #[test]
    fn birthday_already_passed_rolls_to_next_year() {
        // 14/06/2025 -> 14/06/2026 = 364 dias a partir de 15/06/2025
        assert_eq!(days_until_birthday(d(1950, 6, 14), d(2025, 6, 15)), 364);
        // atravessando um ano bissexto
        assert_eq!(days_until_birthday(d(1950, 1, 1), d(2023, 12, 31)), 1);
        assert_eq!(days_until_birthday(d(1950, 3, 1), d(2024, 3, 2)), 364);
    }

    #[test]
    fn leap_day_birthdays() {
        // 2025 não é bissexto: comemora em 28/02
        assert_eq!(days_until_birthday(d(1944, 2, 29), d(2025, 2, 28)), 0);
        assert_eq!(days_until_birthday(d(1944, 2, 29), d(2024, 2, 29)), 0);
        assert_eq!(days_until_birthday(d(1944, 2, 29), d(2024, 2, 28)), 1);
    }

    #[test]
    fn computes_age() {
        assert_eq!(age_on(d(1940, 6, 15), d(2025, 6, 14)), 84);
        assert_eq!(age_on(d(1940, 6, 15), d(2025, 6, 15)), 85);
        assert_eq!(age_on(d(2030, 1, 1), d(2025, 1, 1)), 0);
    }

    #[test]
    fn month_helpers() {
        assert_eq!(last_day_of_month(2024, 2), Some(29));
        assert_eq!(last_day_of_month(2025, 2), Some(28));
        assert_eq!(last_day_of_month(2025, 12), Some(31));
        assert_eq!(last_day_of_month(2025, 13), None);
        assert_eq!(clamp_day(2025, 4, 31), Some(d(2025, 4, 30)));
        assert_eq!(clamp_day(2025, 4, 0), Some(d(2025, 4, 1)));
    }

    #[test]
    fn recurrence_steps() {
        let jan31 = d(2025, 1, 31);
        assert_eq!(next_occurrence(jan31, Recurrence::None, 31), None);
        assert_eq!(next_occurrence(jan31, Recurrence::Daily, 31), Some(d(2025, 2, 1)));
        assert_eq!(next_occurrence(jan31, Recurrence::Weekly, 31), Some(d(2025, 2, 7)));
        assert_eq!(next_occurrence(jan31, Recurrence::Monthly, 31), Some(d(2025, 2, 28)));
        assert_eq!(next_occurrence(d(2024, 2, 29), Recurrence::Yearly, 29), Some(d(2025, 2, 28)));
    }

    #[test]
    fn monthly_series_keep_their_day() {
        let mut date = d(2025, 1, 31);
        let mut series = Vec::new();
        for _ in 0..4 {
            date = next_occurrence(date, Recurrence::Monthly, 31).unwrap();
            series.push(date);
        }
        assert_eq!(series, vec![d(2025, 2, 28), d(2025, 3, 31), d(2025, 4, 30), d(2025, 5, 31)]);

        // 29/02 anual: 28/02 nos anos comuns, 29/02 de novo no bissexto
        let mut leap = d(2024, 2, 29);
        for _ in 0..4 {
            leap = next_occurrence(leap, Recurrence::Yearly, 29).unwrap();
        }
        assert_eq!(leap, d(2028, 2, 29));
    }

    struct Person(&'static str, NaiveDate);

    impl HasBirthDate for Person {
        fn birth_date(&self) -> NaiveDate {
            self.1
        }
    }

    #[test]
    fn upcoming_birthdays_are_sorted_and_windowed() {
        let today = d(2025, 6, 15);
        let people = vec![
            Person("Ana", d(1950, 7, 1)),
            Person("Bento", d(1948, 6, 15)),
            Person("Clara", d(1960, 12, 25)),
            Person("Davi", d(1939, 6, 20)),
        ];
        let names: Vec<(&str, i64)> = upcoming_birthdays(people, today, 30)
            .into_iter()
            .map(|(p, days)| (p.0, days))
            .collect();
        assert_eq!(names, vec![("Bento", 0), ("Davi", 5), ("Ana", 16)]);
    }
}

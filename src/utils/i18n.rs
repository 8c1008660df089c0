// ============================================================================
// MÓDULO DE INTERNACIONALIZACIÓN
// ============================================================================
// El producto está en ruso; EN queda como idioma de respaldo.

use std::collections::HashMap;

/// Obtener diccionario de traducciones para un idioma
fn get_translations(lang: &str) -> HashMap<&'static str, &'static str> {
    let mut translations = HashMap::new();
    let lang_upper = lang.to_uppercase();

    match lang_upper.as_str() {
        "EN" => {
            // Notificaciones
            translations.insert("login_invalid", "Invalid email or password");
            translations.insert("register_failed", "Registration failed");
            translations.insert("saved_ok", "Saved successfully");
            translations.insert("save_failed", "Failed to save");
            translations.insert("deleted_ok", "Deleted successfully");
            translations.insert("delete_failed", "Failed to delete");
            translations.insert("uploaded_ok", "Uploaded successfully");
            translations.insert("upload_failed", "Failed to upload");
            translations.insert("project_created", "Project created");
            translations.insert("created_ok", "Created successfully");
            translations.insert("create_failed", "Failed to create");
            translations.insert("session_expired", "Session expired, please sign in again");
            translations.insert("load_failed", "Failed to load data");

            // Validación
            translations.insert("invalid_email", "Invalid email address");
            translations.insert("password_required", "Password is required");
            translations.insert("password_too_short", "Password must be at least 13 characters long");
            translations.insert("password_needs_upper", "Password must contain at least one uppercase letter");
            translations.insert("password_needs_lower", "Password must contain at least one lowercase letter");
            translations.insert("password_needs_digit", "Password must contain at least one digit");
            translations.insert("password_needs_special", "Password must contain at least one special character");
            translations.insert("first_name_required", "First name is required");
            translations.insert("last_name_required", "Last name is required");
            translations.insert("name_required", "Name is required");
            translations.insert("title_required", "Title is required");
            translations.insert("owner_required", "Current user is unknown");
            translations.insert("test_case_required", "Select a test case");

            // UI
            translations.insert("login_title", "Sign in");
            translations.insert("register_title", "Sign up");
            translations.insert("email", "Email");
            translations.insert("password", "Password");
            translations.insert("first_name", "First name");
            translations.insert("last_name", "Last name");
            translations.insert("login", "Sign in");
            translations.insert("register", "Sign up");
            translations.insert("no_account", "No account?");
            translations.insert("have_account", "Already registered?");
            translations.insert("logout", "Sign out");
            translations.insert("projects", "Projects");
            translations.insert("new_project", "Create project");
            translations.insert("search", "Search");
            translations.insert("new", "New");
            translations.insert("save", "Save");
            translations.insert("cancel", "Cancel");
            translations.insert("edit", "Edit");
            translations.insert("delete", "Delete");
            translations.insert("confirm_delete_title", "Delete?");
            translations.insert("confirm_delete_text", "Are you sure? This action cannot be undone.");
            translations.insert("loading", "Loading...");
            translations.insert("error", "Error");
            translations.insert("empty", "Nothing here yet");
            translations.insert("public", "Public");
            translations.insert("private", "Private");
            translations.insert("repository", "Repository");
            translations.insert("test_suites", "Test suites");
            translations.insert("test_runs", "Test runs");
            translations.insert("test_plans", "Test plans");
            translations.insert("defects", "Defects");
            translations.insert("milestones", "Milestones");
            translations.insert("tags", "Tags");
            translations.insert("attachments", "Attachments");
            translations.insert("upload", "Upload");
            translations.insert("name", "Name");
            translations.insert("title", "Title");
            translations.insert("description", "Description");
            translations.insert("preconditions", "Preconditions");
            translations.insert("actual_result", "Actual result");
            translations.insert("severity", "Severity");
            translations.insert("priority", "Priority");
            translations.insert("status", "Status");
            translations.insert("due_date", "Due date");
            translations.insert("created_at", "Created");
            translations.insert("author", "Author");
            translations.insert("file_name", "File");
            translations.insert("file_size", "Size");
            translations.insert("actions", "Actions");
            translations.insert("test_cases_count", "test cases");
            translations.insert("defects_count", "defects");
            translations.insert("members_count", "members");
            translations.insert("test_runs_count", "Test runs");
            translations.insert("milestone", "Milestone");
            translations.insert("steps", "Steps");
            translations.insert("expected_result", "Expected result");
            translations.insert("previous_page", "Back");
            translations.insert("next_page", "Next");
            translations.insert("back", "Back");
            translations.insert("access_type", "Access");
            translations.insert("actual_result_required", "Actual result is required");
            translations.insert("due_date_required", "Due date is required");
            translations.insert("add_parameter", "Add parameter");
            translations.insert("add_step", "Add step");
            translations.insert("add_test_case", "Add test case");
            translations.insert("all_severities", "All severities");
            translations.insert("all_suites", "All suites");
            translations.insert("create", "Create");
            translations.insert("create_test_case", "Create test case");
            translations.insert("create_test_plan", "Create test plan");
            translations.insert("create_test_run", "Create test run");
            translations.insert("delete_project", "Delete project");
            translations.insert("passed", "Passed");
            translations.insert("failed", "Failed");
            translations.insert("skipped", "Skipped");
            translations.insert("members", "Members");
            translations.insert("owner", "Owner");
            translations.insert("owner_only", "Only the project owner can change settings");
            translations.insert("page", "Page");
            translations.insert("parameters", "Parameters");
            translations.insert("value", "Value");
            translations.insert("position", "#");
            translations.insert("postconditions", "Postconditions");
            translations.insert("profile", "Profile");
            translations.insert("settings", "Settings");
            translations.insert("suite", "Suite");
            translations.insert("summary", "Summary");
            translations.insert("test_cases", "Test cases");
            translations.insert("test_case", "Test case");
        }
        _ => {
            // Notificaciones
            translations.insert("login_invalid", "Неверная почта или пароль");
            translations.insert("register_failed", "Ошибка регистрации");
            translations.insert("saved_ok", "Успешно сохранено");
            translations.insert("save_failed", "Ошибка при сохранении");
            translations.insert("deleted_ok", "Успешно удалено");
            translations.insert("delete_failed", "Ошибка при удалении");
            translations.insert("uploaded_ok", "Успешно загружено");
            translations.insert("upload_failed", "Ошибка при загрузке");
            translations.insert("project_created", "Проект успешно создан");
            translations.insert("created_ok", "Успешно создано");
            translations.insert("create_failed", "Ошибка при создании");
            translations.insert("session_expired", "Сессия истекла, войдите снова");
            translations.insert("load_failed", "Не удалось загрузить данные");

            // Validación
            translations.insert("invalid_email", "Некорректный адрес почты");
            translations.insert("password_required", "Введите пароль");
            translations.insert("password_too_short", "Пароль должен содержать не менее 13 символов");
            translations.insert("password_needs_upper", "Пароль должен содержать заглавную букву");
            translations.insert("password_needs_lower", "Пароль должен содержать строчную букву");
            translations.insert("password_needs_digit", "Пароль должен содержать цифру");
            translations.insert("password_needs_special", "Пароль должен содержать специальный символ");
            translations.insert("first_name_required", "Введите имя");
            translations.insert("last_name_required", "Введите фамилию");
            translations.insert("name_required", "Введите название");
            translations.insert("title_required", "Введите заголовок");
            translations.insert("owner_required", "Текущий пользователь не определён");
            translations.insert("test_case_required", "Выберите тест-кейс");

            // UI
            translations.insert("login_title", "Войти в систему");
            translations.insert("register_title", "Регистрация");
            translations.insert("email", "Почта");
            translations.insert("password", "Пароль");
            translations.insert("first_name", "Имя");
            translations.insert("last_name", "Фамилия");
            translations.insert("login", "Войти");
            translations.insert("register", "Регистрация");
            translations.insert("no_account", "Нет аккаунта?");
            translations.insert("have_account", "Уже есть аккаунт?");
            translations.insert("logout", "Выйти");
            translations.insert("projects", "Проекты");
            translations.insert("new_project", "Создать новый проект");
            translations.insert("search", "Поиск");
            translations.insert("new", "Создать");
            translations.insert("save", "Сохранить");
            translations.insert("cancel", "Отмена");
            translations.insert("edit", "Изменить");
            translations.insert("delete", "Удалить");
            translations.insert("confirm_delete_title", "Удалить?");
            translations.insert("confirm_delete_text", "Вы уверены? Это действие необратимо.");
            translations.insert("loading", "Загрузка...");
            translations.insert("error", "Ошибка");
            translations.insert("empty", "Пока ничего нет");
            translations.insert("public", "Публичный");
            translations.insert("private", "Приватный");
            translations.insert("repository", "Репозиторий");
            translations.insert("test_suites", "Тест-сьюты");
            translations.insert("test_runs", "Тестовые прогоны");
            translations.insert("test_plans", "Тест-планы");
            translations.insert("defects", "Дефекты");
            translations.insert("milestones", "Майлстоуны");
            translations.insert("tags", "Тэги");
            translations.insert("attachments", "Вложения");
            translations.insert("upload", "Загрузить");
            translations.insert("name", "Название");
            translations.insert("title", "Заголовок");
            translations.insert("description", "Описание");
            translations.insert("preconditions", "Предусловия");
            translations.insert("actual_result", "Фактический результат");
            translations.insert("severity", "Серьёзность");
            translations.insert("priority", "Приоритет");
            translations.insert("status", "Статус");
            translations.insert("due_date", "Срок");
            translations.insert("created_at", "Дата создания");
            translations.insert("author", "Автор");
            translations.insert("file_name", "Файл");
            translations.insert("file_size", "Размер");
            translations.insert("actions", "Действия");
            translations.insert("test_cases_count", "тест кейсов");
            translations.insert("defects_count", "дефектов");
            translations.insert("members_count", "участников");
            translations.insert("test_runs_count", "Прогоны");
            translations.insert("milestone", "Майлстоун");
            translations.insert("steps", "Шаги");
            translations.insert("expected_result", "Ожидаемый результат");
            translations.insert("previous_page", "Назад");
            translations.insert("next_page", "Вперёд");
            translations.insert("back", "Назад");
            translations.insert("access_type", "Доступ");
            translations.insert("actual_result_required", "Укажите фактический результат");
            translations.insert("due_date_required", "Укажите срок");
            translations.insert("add_parameter", "Добавить параметр");
            translations.insert("add_step", "Добавить шаг");
            translations.insert("add_test_case", "Добавить тест-кейс");
            translations.insert("all_severities", "Все серьезности");
            translations.insert("all_suites", "Все наборы");
            translations.insert("create", "Создать");
            translations.insert("create_test_case", "Создание тест-кейса");
            translations.insert("create_test_plan", "Создание тест-плана");
            translations.insert("create_test_run", "Создание тестового прогона");
            translations.insert("delete_project", "Удалить проект");
            translations.insert("passed", "Пройдено");
            translations.insert("failed", "Провалено");
            translations.insert("skipped", "Пропущено");
            translations.insert("members", "Участники");
            translations.insert("owner", "Владелец");
            translations.insert("owner_only", "Изменять настройки может только владелец проекта");
            translations.insert("page", "Страница");
            translations.insert("parameters", "Параметры");
            translations.insert("value", "Значение");
            translations.insert("position", "№");
            translations.insert("postconditions", "Постусловия");
            translations.insert("profile", "Профиль");
            translations.insert("settings", "Настройки");
            translations.insert("suite", "Набор");
            translations.insert("summary", "Итог");
            translations.insert("test_cases", "Тест-кейсы");
            translations.insert("test_case", "Тест-кейс");
        }
    }

    translations
}

/// Función de traducción
///
/// Devuelve la clave tal cual si no hay traducción.
pub fn t(key: &str, lang: &str) -> String {
    let translations = get_translations(lang);

    if let Some(translation) = translations.get(key) {
        return translation.to_string();
    }

    key.to_string()
}

/// Traducción en el idioma del producto
pub fn tr(key: &str) -> String {
    t(key, crate::utils::constants::DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_is_the_default_language() {
        assert_eq!(tr("login_invalid"), "Неверная почта или пароль");
        assert_eq!(t("login_invalid", "xx"), "Неверная почта или пароль");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        assert_eq!(t("no_such_key", "EN"), "no_such_key");
    }

    #[test]
    fn both_languages_define_the_same_keys() {
        let ru = get_translations("RU");
        let en = get_translations("EN");
        let mut ru_keys: Vec<_> = ru.keys().collect();
        let mut en_keys: Vec<_> = en.keys().collect();
        ru_keys.sort();
        en_keys.sort();
        assert_eq!(ru_keys, en_keys);
    }
}
